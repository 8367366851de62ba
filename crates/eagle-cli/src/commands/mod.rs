//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod folders;
pub mod image;
pub mod video;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use eagle_core::{NodeOutput, SendOptions, Settings, TagPolicy};
use serde_json::Value;

/// Inputs shared by the image and video nodes
#[derive(Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// Positive prompt (passed through and used for tags)
    #[arg(long, default_value = "")]
    pub positive: String,

    /// Negative prompt (passed through)
    #[arg(long, default_value = "")]
    pub negative: String,

    /// Tags to attach: "None", "Prompt", "Checkpoint" or "Prompt + Checkpoint"
    #[arg(long)]
    pub save_tags: Option<TagPolicy>,

    /// Eagle folder name or id (created when missing)
    #[arg(long)]
    pub folder: Option<String>,

    /// Extra note appended to the annotation
    #[arg(long, default_value = "")]
    pub memo: String,

    /// JSON file with the executed prompt graph
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// JSON file with the extra PNG info (saved workflow)
    #[arg(long)]
    pub extra_pnginfo_file: Option<PathBuf>,
}

impl SendArgs {
    /// Resolve against settings defaults and read the metadata files
    pub fn into_options(self, settings: &Settings) -> Result<SendOptions> {
        Ok(SendOptions {
            positive: self.positive,
            negative: self.negative,
            save_tags: self.save_tags.unwrap_or(settings.default_tag_policy),
            folder: self
                .folder
                .or_else(|| settings.default_folder.clone())
                .unwrap_or_default(),
            memo: self.memo,
            prompt: read_json(self.prompt_file.as_deref())?,
            extra_pnginfo: read_json(self.extra_pnginfo_file.as_deref())?,
        })
    }
}

fn read_json(path: Option<&Path>) -> Result<Option<Value>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
    Ok(Some(value))
}

/// Print the pass-through pair for downstream consumers
pub fn print_output(output: &NodeOutput) -> Result<()> {
    let json = serde_json::json!({
        "positive": output.positive,
        "negative": output.negative,
    });
    println!("{}", serde_json::to_string(&json)?);
    Ok(())
}

pub fn print_policy(policy: TagPolicy) -> String {
    match policy {
        TagPolicy::None => policy.as_str().dimmed().to_string(),
        _ => policy.as_str().cyan().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_into_options_uses_settings_defaults() {
        let settings = Settings {
            default_folder: Some("Renders".to_string()),
            default_tag_policy: TagPolicy::Checkpoint,
            ..Settings::default()
        };

        let options = SendArgs::default().into_options(&settings).unwrap();
        assert_eq!(options.folder, "Renders");
        assert_eq!(options.save_tags, TagPolicy::Checkpoint);
        assert!(options.prompt.is_none());

        let args = SendArgs {
            folder: Some("Other".to_string()),
            save_tags: Some(TagPolicy::None),
            ..Default::default()
        };
        let options = args.into_options(&settings).unwrap();
        assert_eq!(options.folder, "Other");
        assert_eq!(options.save_tags, TagPolicy::None);
    }

    #[test]
    fn test_into_options_reads_prompt_graph() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = temp_dir.path().join("prompt.json");
        std::fs::write(
            &prompt,
            r#"{"4": {"class_type": "CheckpointLoaderSimple", "inputs": {"ckpt_name": "m.safetensors"}}}"#,
        )
        .unwrap();

        let args = SendArgs {
            prompt_file: Some(prompt),
            ..Default::default()
        };
        let options = args.into_options(&Settings::default()).unwrap();
        assert_eq!(
            options.prompt.unwrap()["4"]["inputs"]["ckpt_name"],
            "m.safetensors"
        );
    }

    #[test]
    fn test_into_options_reports_missing_file() {
        let args = SendArgs {
            extra_pnginfo_file: Some(PathBuf::from("/definitely/not/here.json")),
            ..Default::default()
        };
        assert!(args.into_options(&Settings::default()).is_err());
    }
}
