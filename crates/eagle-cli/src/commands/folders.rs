//! Folders command - Inspect and create Eagle folders

use anyhow::Result;
use colored::Colorize;

use crate::config::SettingsManager;

pub async fn list(base_url: Option<&str>) -> Result<()> {
    let settings = SettingsManager::new()?.load()?;
    let client = crate::api::connect(&settings, base_url).await;

    let outcome = client.list_folders().await;
    if let Some(ref e) = outcome.error {
        println!("{}", format!("⚠️  Could not list folders: {}", e).yellow());
        return Ok(());
    }

    if outcome.value.is_empty() {
        println!("{}", "No folders".dimmed());
        return Ok(());
    }

    for folder in &outcome.value {
        println!("  {}  {}", folder.id.dimmed(), folder.name);
    }
    Ok(())
}

pub async fn find(name_or_id: &str, base_url: Option<&str>) -> Result<()> {
    let settings = SettingsManager::new()?.load()?;
    let client = crate::api::connect(&settings, base_url).await;

    let outcome = client.find_or_create_folder(name_or_id).await;
    match (outcome.value.as_str(), outcome.error) {
        ("", Some(e)) => {
            println!("{}", format!("⚠️  Folder unavailable: {}", e).yellow());
        }
        ("", None) => {
            println!("{}", "No folder name given".dimmed());
        }
        (id, _) => {
            println!("{} {} → {}", "✓".green(), name_or_id, id.cyan());
        }
    }
    Ok(())
}
