//! Error types for Eagle Send

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Eagle Send
#[derive(Error, Debug)]
pub enum EagleError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Eagle request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Eagle returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Unexpected response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EagleError {
    /// Whether the error came from talking to the catalog rather than from local input
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EagleError::Transport { .. }
                | EagleError::Status { .. }
                | EagleError::InvalidResponse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EagleError>;

/// Outcome of a call whose failure is absorbed.
///
/// A `BestEffort` always carries a usable value. When the underlying call
/// failed, `value` is the fallback and `error` holds what was swallowed, so
/// callers can still report it without having to handle it.
#[derive(Debug)]
#[must_use]
pub struct BestEffort<T> {
    pub value: T,
    pub error: Option<EagleError>,
}

impl<T> BestEffort<T> {
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    pub fn degraded(value: T, error: EagleError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BestEffort<U> {
        BestEffort {
            value: f(self.value),
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_effort_keeps_fallback_and_error() {
        let outcome = BestEffort::degraded(
            String::new(),
            EagleError::Transport {
                endpoint: "/api/folder/create".to_string(),
                message: "connection refused".to_string(),
            },
        );

        assert!(outcome.is_degraded());
        assert!(outcome.error.as_ref().unwrap().is_transport());
        assert_eq!(outcome.into_value(), "");
    }

    #[test]
    fn test_file_not_found_is_not_transport() {
        let err = EagleError::FileNotFound(PathBuf::from("/tmp/missing.mp4"));
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "File not found: /tmp/missing.mp4");
    }
}
