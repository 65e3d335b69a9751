//! Error types for the ban registry
//!
//! This module defines the errors that can occur while loading or saving
//! registry state. Expected conditions (unbanning an identity that was never
//! banned, querying an absent identity) are not errors; they are reported
//! through `Option`/`bool` results on the registry itself.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during registry persistence
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The state file exists but could not be parsed
    #[error("corrupt state file {path}: {source}")]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The state file carries a format version this build does not understand
    #[error("unsupported state format version {0}")]
    UnsupportedVersion(u32),

    /// File I/O failed while reading or writing the state file
    #[error("persistence failure on {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for registry persistence operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RegistryError::UnsupportedVersion(7);
        assert_eq!(error.to_string(), "unsupported state format version 7");

        let error = RegistryError::Persistence {
            path: PathBuf::from("data/ctban/bans.db"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("data/ctban/bans.db"));
        assert!(error.to_string().contains("denied"));
    }
}
