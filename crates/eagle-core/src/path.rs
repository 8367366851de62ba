//! Path translation for Eagle running on the other side of WSL

use std::process::Command;
use std::sync::Arc;

use crate::environment::{EnvironmentProbe, Runtime};

/// Default program that converts Linux paths to Windows paths
pub const DEFAULT_TRANSLATOR: &str = "wslpath";

/// Converts local paths into the form Eagle can open
#[derive(Clone)]
pub struct PathAdapter {
    probe: Arc<dyn EnvironmentProbe>,
    translator: String,
}

impl PathAdapter {
    pub fn new(probe: Arc<dyn EnvironmentProbe>) -> Self {
        Self {
            probe,
            translator: DEFAULT_TRANSLATOR.to_string(),
        }
    }

    pub fn with_translator(mut self, program: impl Into<String>) -> Self {
        self.translator = program.into();
        self
    }

    pub fn translator(&self) -> &str {
        &self.translator
    }

    /// Translate `path` when running under WSL, otherwise return it as is.
    ///
    /// Never fails: any problem running the translator is logged and the
    /// original path is returned.
    pub fn adapt(&self, path: &str) -> String {
        if self.probe.runtime() != Runtime::Wsl {
            return path.to_string();
        }

        match Command::new(&self.translator).args(["-w", path]).output() {
            Ok(output) if output.status.success() => {
                let translated = match String::from_utf8(output.stdout) {
                    Ok(text) => text.trim().to_string(),
                    Err(e) => {
                        tracing::warn!(
                            "{} returned non-UTF-8 output for {}: {}",
                            self.translator,
                            path,
                            e
                        );
                        return path.to_string();
                    }
                };
                if translated.is_empty() {
                    tracing::warn!("{} returned no output for {}", self.translator, path);
                    return path.to_string();
                }
                tracing::debug!("Translated {} -> {}", path, translated);
                translated
            }
            Ok(output) => {
                tracing::warn!(
                    "Path conversion failed for {} ({}): {}",
                    path,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                path.to_string()
            }
            Err(e) => {
                tracing::warn!("Path conversion error for {}: {}", path, e);
                path.to_string()
            }
        }
    }
}

impl std::fmt::Debug for PathAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathAdapter")
            .field("runtime", &self.probe.runtime())
            .field("translator", &self.translator)
            .finish()
    }
}
