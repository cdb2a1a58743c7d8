//! Environment validation errors.

use semver::Version;
use thiserror::Error;

/// Errors raised while checking that a usable `uv` is installed.
#[derive(Error, Debug)]
pub enum PreflightError {
    /// Executable is not on `PATH`
    #[error("{program} not found")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    /// `uv --version` could not be run or failed
    #[error("Failed to query the {program} version: {message}")]
    VersionQuery { program: String, message: String },

    /// `uv --version` printed something unexpected
    #[error("Unrecognized version output: '{output}'")]
    UnparsableVersion { output: String },

    /// Installed version is older than the minimum
    #[error("version of uv needs to be >= {minimum}, found {found}")]
    Unsupported { found: Version, minimum: Version },
}

/// Result type alias for preflight checks.
pub type Result<T> = std::result::Result<T, PreflightError>;

impl PreflightError {
    pub fn version_query(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::VersionQuery {
            program: program.into(),
            message: message.into(),
        }
    }

    pub fn unparsable_version(output: impl Into<String>) -> Self {
        Self::UnparsableVersion {
            output: output.into(),
        }
    }
}
