//! Config command - Manage CLI configuration

use crate::config::SettingsManager;
use anyhow::{Context, Result};
use colored::Colorize;
use eagle_core::{Settings, TagPolicy};

/// Set the Eagle API base URL
pub async fn set_url(url: &str) -> Result<()> {
    let manager = SettingsManager::new()?;
    let mut settings = manager.load().context("Failed to load settings")?;

    settings.base_url = Some(normalize_url(url)?);
    manager.save(&settings).context("Failed to save settings")?;

    println!(
        "{} Eagle API URL set to: {}",
        "✓".green(),
        settings.base_url.unwrap_or_default().cyan()
    );
    Ok(())
}

/// Set the folder used when none is given
pub async fn set_folder(folder: &str) -> Result<()> {
    let manager = SettingsManager::new()?;
    let mut settings = manager.load().context("Failed to load settings")?;

    let folder = folder.trim();
    settings.default_folder = if folder.is_empty() {
        None
    } else {
        Some(folder.to_string())
    };
    manager.save(&settings).context("Failed to save settings")?;

    match settings.default_folder {
        Some(ref name) => println!("{} Default folder set to: {}", "✓".green(), name.cyan()),
        None => println!("{} Default folder cleared", "✓".green()),
    }
    Ok(())
}

/// Set the tag policy used when none is given
pub async fn set_tags(policy: TagPolicy) -> Result<()> {
    let manager = SettingsManager::new()?;
    let mut settings = manager.load().context("Failed to load settings")?;

    settings.default_tag_policy = policy;
    manager.save(&settings).context("Failed to save settings")?;

    println!("{} Default tags set to: {}", "✓".green(), policy.as_str().cyan());
    Ok(())
}

/// Show current configuration
pub async fn show() -> Result<()> {
    let manager = SettingsManager::new()?;
    let settings = manager.load().context("Failed to load settings")?;

    println!("{}", "Eagle Send Configuration".bold().underline());
    println!();

    println!("{}", "Connection:".cyan().bold());
    match settings.base_url {
        Some(ref url) => println!("  API URL:    {}", url),
        None => println!(
            "  API URL:    {} (port {})",
            "auto-detected".dimmed(),
            settings.port
        ),
    }
    println!("  Translator: {}", settings.path_translator);
    println!();

    println!("{}", "Defaults:".cyan().bold());
    println!(
        "  Folder: {}",
        settings
            .default_folder
            .as_deref()
            .unwrap_or("(root)")
    );
    println!("  Tags:   {}", settings.default_tag_policy);
    println!();

    println!("{}", "Config Files:".cyan().bold());
    println!(
        "  Settings: {}",
        manager.settings_path().display().to_string().dimmed()
    );

    Ok(())
}

/// Reset configuration to defaults
pub async fn reset(yes: bool) -> Result<()> {
    use dialoguer::Confirm;

    if !yes {
        let confirm = Confirm::new()
            .with_prompt("Are you sure you want to reset all configuration?")
            .default(false)
            .interact()?;

        if !confirm {
            println!("{}", "Reset cancelled.".yellow());
            return Ok(());
        }
    }

    SettingsManager::new()?
        .save(&Settings::default())
        .context("Failed to save default settings")?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!(
            "Invalid URL: {}. URL must start with http:// or https://",
            url
        );
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url(" http://localhost:41595/ ").unwrap(),
            "http://localhost:41595"
        );
        assert!(normalize_url("localhost:41595").is_err());
    }
}
