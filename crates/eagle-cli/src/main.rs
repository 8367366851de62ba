//! Eagle Send CLI
//!
//! Sends generated images and videos, with their generation metadata, to a
//! locally running Eagle catalog.

mod api;
mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use eagle_core::TagPolicy;
use tracing::{error, info};

use commands::SendArgs;

#[derive(Parser)]
#[command(name = "eagle-send")]
#[command(author, version, about = "Eagle Send - Send generated media to the Eagle catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Eagle API base URL (defaults to auto-detection)
    #[arg(long, global = true, env = "EAGLE_API_URL")]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send saved images to Eagle
    Image {
        /// Image files to send
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        args: SendArgs,
    },

    /// Send a video (and its metadata PNG) to Eagle
    Video {
        /// Video file to send
        video_path: PathBuf,

        /// Do not send the <video>.png metadata snapshot
        #[arg(long)]
        skip_metadata_png: bool,

        #[command(flatten)]
        args: SendArgs,
    },

    /// Inspect Eagle folders
    Folders {
        #[command(subcommand)]
        action: FoldersAction,
    },

    /// Diagnose environment and Eagle connection
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum FoldersAction {
    /// List all folders, flattened
    List,
    /// Resolve a folder by name or id, creating it when missing
    Find {
        /// Folder name or id
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set the Eagle API URL (e.g., http://localhost:41595)
    SetUrl { url: String },
    /// Set the default folder (empty to clear)
    SetFolder { folder: String },
    /// Set the default tag policy
    SetTags { policy: TagPolicy },
    /// Show current configuration
    Show,
    /// Reset to default configuration
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "eagle_cli=debug,eagle_core=debug"
        } else {
            "eagle_cli=info,eagle_core=info"
        })
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    info!("Starting Eagle Send");

    let base_url = cli.base_url.as_deref();

    let result = match cli.command {
        Commands::Image { images, args } => commands::image::run(images, args, base_url).await,
        Commands::Video {
            video_path,
            skip_metadata_png,
            args,
        } => commands::video::run(video_path, skip_metadata_png, args, base_url).await,
        Commands::Folders { action } => match action {
            FoldersAction::List => commands::folders::list(base_url).await,
            FoldersAction::Find { name_or_id } => {
                commands::folders::find(&name_or_id, base_url).await
            }
        },
        Commands::Doctor => commands::doctor::execute(base_url).await,
        Commands::Config { action } => match action {
            ConfigAction::SetUrl { url } => commands::config::set_url(&url).await,
            ConfigAction::SetFolder { folder } => commands::config::set_folder(&folder).await,
            ConfigAction::SetTags { policy } => commands::config::set_tags(policy).await,
            ConfigAction::Show => commands::config::show().await,
            ConfigAction::Reset { yes } => commands::config::reset(yes).await,
        },
    };

    if let Err(ref e) = result {
        error!("Command failed: {}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_video_command() {
        let cli = Cli::try_parse_from([
            "eagle-send",
            "video",
            "/out/clip.mp4",
            "--positive",
            "a cat, blue sky",
            "--save-tags",
            "Prompt + Checkpoint",
            "--folder",
            "Renders",
            "--skip-metadata-png",
        ])
        .unwrap();

        match cli.command {
            Commands::Video {
                video_path,
                skip_metadata_png,
                args,
            } => {
                assert_eq!(video_path, PathBuf::from("/out/clip.mp4"));
                assert!(skip_metadata_png);
                assert_eq!(args.save_tags, Some(TagPolicy::PromptAndCheckpoint));
                assert_eq!(args.folder.as_deref(), Some("Renders"));
                assert_eq!(args.positive, "a cat, blue sky");
            }
            _ => panic!("expected video command"),
        }
    }

    #[test]
    fn test_image_requires_a_path() {
        assert!(Cli::try_parse_from(["eagle-send", "image"]).is_err());
        assert!(Cli::try_parse_from(["eagle-send", "image", "--save-tags", "bogus", "a.png"]).is_err());
    }
}
