use crate::error::{PreflightError, Result};
use crate::version::{check_version, parse_version_output};
use hooksync_core::{DependencyResolver, ResolutionError};
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolves dependency groups with `uv pip compile`.
///
/// The process is run synchronously and without a timeout.
#[derive(Debug, Clone)]
pub struct UvResolver {
    program: PathBuf,
}

impl UvResolver {
    /// Executable name looked up on `PATH`.
    pub const PROGRAM: &'static str = "uv";

    /// Uses `program` as the uv executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Finds `uv` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::NotFound`] if the executable is missing.
    pub fn locate() -> Result<Self> {
        let program = which::which(Self::PROGRAM).map_err(|source| PreflightError::NotFound {
            program: Self::PROGRAM.to_string(),
            source,
        })?;

        tracing::debug!("Using uv at {}", program.display());
        Ok(Self::new(program))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `uv --version` and parses the result.
    pub fn version(&self) -> Result<Version> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|e| PreflightError::version_query(Self::PROGRAM, e.to_string()))?;

        if !output.status.success() {
            return Err(PreflightError::version_query(
                Self::PROGRAM,
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }

        parse_version_output(&String::from_utf8_lossy(&output.stdout))
    }

    /// Checks that the located `uv` is recent enough.
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::Unsupported`] for versions older than
    /// [`MINIMUM_UV_VERSION`](crate::MINIMUM_UV_VERSION), or a query error if
    /// the version cannot be determined.
    pub fn ensure_supported(&self) -> Result<Version> {
        let version = self.version()?;
        check_version(&version)?;
        tracing::debug!("uv version {} is supported", version);
        Ok(version)
    }

    /// Builds the `uv pip compile` invocation for `manifest_path`.
    ///
    /// `manifest_path` is passed through as given; [`DependencyResolver::compile`]
    /// makes it absolute first.
    pub fn compile_command(&self, manifest_path: &Path, groups: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["pip", "compile"])
            .arg(manifest_path)
            .args(["--no-header", "--quiet"]);
        for group in groups {
            cmd.arg("--group").arg(group);
        }
        cmd
    }
}

impl DependencyResolver for UvResolver {
    fn compile(
        &self,
        manifest_path: &Path,
        groups: &[String],
    ) -> std::result::Result<String, ResolutionError> {
        let manifest_path = absolute_path(manifest_path);
        let mut cmd = self.compile_command(&manifest_path, groups);

        tracing::debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .map_err(|e| ResolutionError::spawn(self.program.display().to_string(), e))?;

        if !output.status.success() {
            tracing::debug!("uv pip compile exited with {}", output.status);
            return Err(ResolutionError::failed(String::from_utf8_lossy(
                &output.stderr,
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Resolves symlinks when the path exists, otherwise only makes it absolute.
fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
