//! Doctor command - Diagnostics

use anyhow::Result;
use colored::Colorize;
use eagle_core::{EnvironmentProbe, Runtime, SystemProbe};

use crate::config::SettingsManager;

pub async fn execute(base_url: Option<&str>) -> Result<()> {
    println!("{}", "🔍 Eagle Send Diagnostics".blue().bold());
    println!();

    // Check OS
    let probe = SystemProbe::new();
    let runtime = probe.runtime();
    println!("{}", "System:".cyan());
    println!("   OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    println!("   Runtime: {}", runtime);
    println!();

    // Check settings
    println!("{}", "Configuration:".cyan());
    let manager = SettingsManager::new()?;
    let settings = match manager.load() {
        Ok(settings) => {
            println!(
                "   {} Settings: {}",
                "✓".green(),
                manager.settings_path().display().to_string().dimmed()
            );
            settings
        }
        Err(e) => {
            println!("   {} Failed to load settings: {}", "✗".red(), e);
            return Ok(());
        }
    };
    let url = crate::api::resolve_base_url(&settings, base_url, &probe);
    println!("   Eagle API: {}", url);
    println!();

    // Path translation only matters under WSL
    println!("{}", "Dependencies:".cyan());
    if runtime == Runtime::Wsl {
        check_binary(&settings.path_translator, "Path translator");
    } else {
        println!("   {}", "Path translation not needed".dimmed());
    }
    println!();

    // Check Eagle
    println!("{}", "Eagle:".cyan());
    let client = crate::api::connect(&settings, base_url).await;
    let check = client.check_connection().await;
    if check.value {
        println!("   {}", "✓ Eagle is reachable".green());
        let folders = client.list_folders().await;
        if !folders.is_degraded() {
            println!("   {} {} folder(s)", "✓".green(), folders.value.len());
        }
    } else {
        println!("   {}", "✗ Eagle is not reachable".red());
        if let Some(e) = check.error {
            println!("      {}", e.to_string().dimmed());
        }
        println!("      Make sure Eagle is running and the port is correct");
    }
    println!();

    println!("{}", "Done!".green().bold());

    Ok(())
}

fn check_binary(name: &str, description: &str) {
    match which::which(name) {
        Ok(path) => {
            let path_str = path.display().to_string();
            println!("   {} {} - {}", "✓".green(), description, path_str.dimmed());
        }
        Err(_) => {
            println!("   {} {} - {}", "✗".red(), description, "not found".red());
        }
    }
}
