//! Image command - Send saved images to Eagle

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use eagle_core::{send_images, ImageRequest};

use super::{print_output, print_policy, SendArgs};
use crate::config::SettingsManager;

pub async fn run(images: Vec<PathBuf>, args: SendArgs, base_url: Option<&str>) -> Result<()> {
    let settings = SettingsManager::new()?.load()?;
    let options = args.into_options(&settings)?;
    let request = ImageRequest { images, options };
    request.validate()?;

    let client = crate::api::connect(&settings, base_url).await;
    let output = send_images(&client, &request).await?;

    println!(
        "{} Sent {} image(s) to Eagle (tags: {})",
        "✓".green(),
        request.images.len(),
        print_policy(request.options.save_tags)
    );
    print_output(&output)
}
