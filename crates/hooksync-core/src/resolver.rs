use crate::error::ResolutionError;
use crate::requirements::parse_pinned_requirements;
use std::path::Path;

/// Computes a pinned requirements listing for a manifest.
///
/// Implementors wrap an external resolver (`uv pip compile`) and return its
/// standard output untouched. Filtering happens in
/// [`resolve_dependencies`].
pub trait DependencyResolver {
    /// Resolves `groups` of the manifest at `manifest_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the resolver cannot be started or
    /// exits with a non-zero status.
    fn compile(&self, manifest_path: &Path, groups: &[String]) -> Result<String, ResolutionError>;
}

/// Resolves the dependency list for the hook.
///
/// Runs the resolver once and filters its output with
/// [`parse_pinned_requirements`].
pub fn resolve_dependencies(
    resolver: &dyn DependencyResolver,
    manifest_path: &Path,
    groups: &[String],
) -> Result<Vec<String>, ResolutionError> {
    let listing = resolver.compile(manifest_path, groups)?;
    let deps = parse_pinned_requirements(&listing);

    tracing::debug!(
        "Resolved {} dependencies from {} for groups {:?}",
        deps.len(),
        manifest_path.display(),
        groups
    );

    Ok(deps)
}
