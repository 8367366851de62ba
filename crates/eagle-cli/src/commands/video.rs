//! Video command - Send a video and its metadata PNG to Eagle

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use eagle_core::{metadata_snapshot_path, send_video, VideoRequest};

use super::{print_output, print_policy, SendArgs};
use crate::config::SettingsManager;

pub async fn run(
    video_path: PathBuf,
    skip_metadata_png: bool,
    args: SendArgs,
    base_url: Option<&str>,
) -> Result<()> {
    let settings = SettingsManager::new()?.load()?;
    let options = args.into_options(&settings)?;
    let request = VideoRequest {
        video_path,
        send_metadata_png: !skip_metadata_png,
        options,
    };
    request.validate()?;

    let client = crate::api::connect(&settings, base_url).await;
    let output = send_video(&client, &request).await?;

    println!(
        "{} Sent {} to Eagle (tags: {})",
        "✓".green(),
        request.video_path.display(),
        print_policy(request.options.save_tags)
    );
    if request.send_metadata_png {
        let png = metadata_snapshot_path(&request.video_path);
        if png.exists() {
            println!("{} Sent {}", "✓".green(), png.display());
        } else {
            println!("   {}", "No metadata PNG next to the video".dimmed());
        }
    }
    print_output(&output)
}
