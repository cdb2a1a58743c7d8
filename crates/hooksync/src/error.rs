use hooksync_core::{ConfigError, ResolutionError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a synchronization run.
///
/// None of them leave a partially written config behind: the file is only
/// written after every other step succeeded.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action: "read",
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action: "write",
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_transparent() {
        let err: SyncError = ResolutionError::failed("boom").into();
        assert_eq!(err.to_string(), "boom");

        let err: SyncError = ConfigError::hook_not_found("mypy").into();
        assert_eq!(err.to_string(), "mypy hook not found in pre-commit config");
    }

    #[test]
    fn test_io_error_display() {
        let err = SyncError::read(
            ".pre-commit-config.yaml",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(
            err.to_string()
                .starts_with("Failed to read .pre-commit-config.yaml: ")
        );
    }
}
