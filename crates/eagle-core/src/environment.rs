//! Runtime environment detection and host discovery
//!
//! Both the path adapter and host discovery need to know whether we run
//! inside WSL. They share one [`EnvironmentProbe`] so the answer is computed
//! in a single place and can be replaced in tests.

use std::path::PathBuf;

use crate::types::DEFAULT_PORT;

/// Kernel version file that carries the WSL marker
pub const PROC_VERSION_PATH: &str = "/proc/version";

/// Hostname that reaches the Windows host from inside WSL
pub const WSL_HOST: &str = "host.docker.internal";

/// Where the current process runs, as far as reaching Eagle is concerned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Runtime {
    /// Same OS as the Eagle application
    Windows,
    /// Linux under WSL, Eagle lives on the Windows side
    Wsl,
    /// Anything else (macOS, plain Linux)
    Native,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Windows => "windows",
            Runtime::Wsl => "wsl",
            Runtime::Native => "native",
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reports the runtime the process executes in
pub trait EnvironmentProbe: Send + Sync {
    fn runtime(&self) -> Runtime;
}

/// Probe backed by the real OS
#[derive(Debug, Clone)]
pub struct SystemProbe {
    marker_file: PathBuf,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            marker_file: PathBuf::from(PROC_VERSION_PATH),
        }
    }

    /// Read the WSL marker from another file than `/proc/version`
    pub fn with_marker_file(path: impl Into<PathBuf>) -> Self {
        Self {
            marker_file: path.into(),
        }
    }

    fn marker_says_wsl(&self) -> bool {
        match std::fs::read_to_string(&self.marker_file) {
            Ok(content) => content.to_lowercase().contains("microsoft"),
            Err(e) => {
                tracing::debug!("Could not read {:?}: {}", self.marker_file, e);
                false
            }
        }
    }
}

impl EnvironmentProbe for SystemProbe {
    fn runtime(&self) -> Runtime {
        if cfg!(target_os = "windows") {
            return Runtime::Windows;
        }
        if cfg!(target_os = "linux") && self.marker_says_wsl() {
            return Runtime::Wsl;
        }
        Runtime::Native
    }
}

/// Probe that always answers the same runtime
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Runtime);

impl EnvironmentProbe for FixedProbe {
    fn runtime(&self) -> Runtime {
        self.0
    }
}

/// Hostname to reach Eagle on
pub fn resolve_host(probe: &dyn EnvironmentProbe) -> &'static str {
    match probe.runtime() {
        Runtime::Windows => "localhost",
        Runtime::Wsl => WSL_HOST,
        Runtime::Native => "localhost",
    }
}

/// Base URL of the Eagle API for the detected runtime
pub fn default_base_url(probe: &dyn EnvironmentProbe, port: u16) -> String {
    format!("http://{}:{}", resolve_host(probe), port)
}

/// Base URL on the standard Eagle port
pub fn standard_base_url(probe: &dyn EnvironmentProbe) -> String {
    default_base_url(probe, DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_host_per_runtime() {
        assert_eq!(resolve_host(&FixedProbe(Runtime::Windows)), "localhost");
        assert_eq!(resolve_host(&FixedProbe(Runtime::Wsl)), "host.docker.internal");
        assert_eq!(resolve_host(&FixedProbe(Runtime::Native)), "localhost");
    }

    #[test]
    fn test_standard_base_url() {
        assert_eq!(
            standard_base_url(&FixedProbe(Runtime::Wsl)),
            "http://host.docker.internal:41595"
        );
        assert_eq!(
            default_base_url(&FixedProbe(Runtime::Native), 8080),
            "http://localhost:8080"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_system_probe_reads_marker_file() {
        let dir = tempfile::tempdir().unwrap();

        let wsl = dir.path().join("version-wsl");
        std::fs::write(
            &wsl,
            "Linux version 5.15.153.1-microsoft-standard-WSL2 (root@1c602f52c2e4)",
        )
        .unwrap();
        assert_eq!(SystemProbe::with_marker_file(&wsl).runtime(), Runtime::Wsl);

        let plain = dir.path().join("version-plain");
        std::fs::write(&plain, "Linux version 6.8.0-45-generic (buildd@lcy02-amd64)").unwrap();
        assert_eq!(SystemProbe::with_marker_file(&plain).runtime(), Runtime::Native);

        let missing = dir.path().join("does-not-exist");
        assert_eq!(SystemProbe::with_marker_file(&missing).runtime(), Runtime::Native);
    }
}
