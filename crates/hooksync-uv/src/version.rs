//! `uv --version` parsing and the minimum version gate.

use crate::error::{PreflightError, Result};
use semver::Version;

/// Oldest `uv` that supports `pip compile --group`.
pub const MINIMUM_UV_VERSION: Version = Version::new(0, 6, 0);

/// Parses the output of `uv --version`.
///
/// The output looks like `uv 0.6.3 (a0b9f22a2 2025-02-24)`; the second
/// token is the version.
///
/// # Examples
///
/// ```
/// use hooksync_uv::parse_version_output;
///
/// let version = parse_version_output("uv 0.6.3 (a0b9f22a2 2025-02-24)\n").unwrap();
/// assert_eq!(version.minor, 6);
/// ```
pub fn parse_version_output(output: &str) -> Result<Version> {
    let token = output
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| PreflightError::unparsable_version(output.trim()))?;

    Version::parse(token).map_err(|e| {
        tracing::debug!("Failed to parse uv version '{}': {}", token, e);
        PreflightError::unparsable_version(output.trim())
    })
}

/// Rejects any 0.x release older than 0.6.
///
/// # Errors
///
/// Returns [`PreflightError::Unsupported`] when `version` is too old.
pub fn check_version(version: &Version) -> Result<()> {
    if version.major == 0 && version.minor < MINIMUM_UV_VERSION.minor {
        return Err(PreflightError::Unsupported {
            found: version.clone(),
            minimum: MINIMUM_UV_VERSION,
        });
    }
    Ok(())
}
