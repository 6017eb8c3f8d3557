//! Error definitions shared by the control plane.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by compile, read and reload operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Base template unreadable or fragments directory unlistable.
    #[error("Config error at {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single file read or write failed.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The proxy process could not be reloaded.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl ControlError {
    pub(crate) fn config(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures of the reload protocol.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// PID file missing or unreadable.
    #[error("Cannot read PID file {}: {source}", path.display())]
    PidFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PID file exists but holds no PID.
    #[error("PID file {} is empty", path.display())]
    EmptyPid { path: PathBuf },

    /// The proxy binary could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The proxy binary ran but reported failure.
    #[error("{program} exited with {}", code.map_or_else(|| "a signal".to_string(), |c| format!("status {}", c)))]
    ExitStatus { program: String, code: Option<i32> },
}

/// Result type for control plane operations.
pub type ControlResult<T> = Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_names_path() {
        let err = ControlError::io("/cfg/haproxy.cfg", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().contains("/cfg/haproxy.cfg"));

        let err = ControlError::config("/cfg/tmpl/haproxy.tmpl", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.to_string().starts_with("Config error at /cfg/tmpl/haproxy.tmpl"));
    }

    #[test]
    fn test_exit_status_display() {
        let err = ProcessError::ExitStatus {
            program: "haproxy".into(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "haproxy exited with status 1");

        let err = ProcessError::ExitStatus {
            program: "haproxy".into(),
            code: None,
        };
        assert_eq!(err.to_string(), "haproxy exited with a signal");
    }
}
