//! The synchronization pipeline.
//!
//! resolve → parse → update → render → write. Every step before the write
//! is fallible and aborts the run; the config file is touched only once
//! everything else has succeeded.

use crate::error::{Result, SyncError};
use hooksync_core::{
    DependencyResolver, EmitSettings, PreCommitConfig, TARGET_HOOK_ID, resolve_dependencies,
};
use std::path::PathBuf;

/// Inputs of a synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// `pyproject.toml` handed to the resolver.
    pub manifest_path: PathBuf,
    /// `.pre-commit-config.yaml` to rewrite.
    pub config_path: PathBuf,
    /// Dependency groups to resolve, in order.
    pub groups: Vec<String>,
    pub emit: EmitSettings,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Dependencies written to the hook.
    pub dependencies: Vec<String>,
    /// Hook dependencies before the update, if the field existed.
    pub previous: Option<Vec<String>>,
    /// Full text of the updated config.
    pub rendered: String,
}

impl SyncOutcome {
    /// Whether the hook's dependency list changed.
    pub fn dependencies_changed(&self) -> bool {
        self.previous.as_ref() != Some(&self.dependencies)
    }
}

/// Resolves dependencies and renders the updated config without writing it.
///
/// # Errors
///
/// Returns error if the resolver fails, the config cannot be read or
/// parsed, or it has no mypy hook.
pub fn render_updated_config(
    resolver: &dyn DependencyResolver,
    options: &SyncOptions,
) -> Result<SyncOutcome> {
    let dependencies = resolve_dependencies(resolver, &options.manifest_path, &options.groups)?;

    tracing::debug!("Reading {}", options.config_path.display());
    let content = std::fs::read_to_string(&options.config_path)
        .map_err(|e| SyncError::read(&options.config_path, e))?;

    let mut config = PreCommitConfig::parse(&content)?;
    let previous = config
        .find_hook(TARGET_HOOK_ID)
        .and_then(|hook| hook.additional_dependencies.clone());
    config.set_additional_dependencies(TARGET_HOOK_ID, &dependencies)?;

    let rendered = config.render(&options.emit)?;

    Ok(SyncOutcome {
        dependencies,
        previous,
        rendered,
    })
}

/// Rewrites the mypy hook's `additional_dependencies` in the config file.
///
/// # Errors
///
/// Same as [`render_updated_config`], plus write failures. On any error
/// the config file is left as it was.
pub fn sync_hook(resolver: &dyn DependencyResolver, options: &SyncOptions) -> Result<SyncOutcome> {
    let outcome = render_updated_config(resolver, options)?;

    std::fs::write(&options.config_path, &outcome.rendered)
        .map_err(|e| SyncError::write(&options.config_path, e))?;

    tracing::info!(
        "Updated {} hook in {} with {} dependencies{}",
        TARGET_HOOK_ID,
        options.config_path.display(),
        outcome.dependencies.len(),
        if outcome.dependencies_changed() {
            ""
        } else {
            " (unchanged)"
        }
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependencies_changed() {
        let mut outcome = SyncOutcome {
            dependencies: vec!["a==1".into()],
            previous: Some(vec!["a==1".into()]),
            rendered: String::new(),
        };
        assert!(!outcome.dependencies_changed());

        outcome.previous = Some(vec!["a==0.9".into()]);
        assert!(outcome.dependencies_changed());

        outcome.previous = None;
        assert!(outcome.dependencies_changed());
    }
}
