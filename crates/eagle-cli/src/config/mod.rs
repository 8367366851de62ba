//! Configuration management

use anyhow::{Context, Result};
use eagle_core::Settings;
use std::path::{Path, PathBuf};

/// Loads and saves `settings.json` under the eagle-send home directory
pub struct SettingsManager {
    home: PathBuf,
}

impl SettingsManager {
    /// Manager for the default home (`$EAGLE_SEND_HOME` or `~/.eagle-send`)
    pub fn new() -> Result<Self> {
        Ok(Self {
            home: Self::eagle_home()?,
        })
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Get the eagle-send home directory
    pub fn eagle_home() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("EAGLE_SEND_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".eagle-send"))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.home.join("settings.json")
    }

    /// Load settings from disk, writing defaults on first use
    pub fn load(&self) -> Result<Settings> {
        let path = self.settings_path();

        if !path.exists() {
            let settings = Settings::default();
            self.save(&settings)?;
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {:?}", path))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let path = self.settings_path();

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        Ok(())
    }
}
