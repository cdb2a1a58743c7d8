//! Parsing of pinned requirement listings (`uv pip compile` output).

/// Packages mypy ships with, or pulls in itself, which must not be listed
/// as additional dependencies of the hook.
pub const BUNDLED_PACKAGES: &[&str] = &[
    "mypy",
    "mypy-extensions",
    // python < 3.11
    "tomli",
    "typing-extensions",
];

/// Extracts the dependency list from a pinned requirements listing.
///
/// Every non-blank line that does not start with `#` contributes its first
/// whitespace-delimited token, unless the text before the first `==` names
/// one of [`BUNDLED_PACKAGES`]. Output order follows input order.
///
/// # Examples
///
/// ```
/// use hooksync_core::parse_pinned_requirements;
///
/// let listing = "requests==2.31.0\n    # via app\nmypy==1.8.0\n";
/// assert_eq!(parse_pinned_requirements(listing), vec!["requests==2.31.0"]);
/// ```
pub fn parse_pinned_requirements(listing: &str) -> Vec<String> {
    let mut deps = Vec::new();

    for line in listing.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let package = line.split("==").next().unwrap_or(line);
        if is_bundled(package) {
            tracing::debug!("Skipping bundled package: {}", package);
            continue;
        }

        // Drop trailing annotations such as `; python_version < '3.11'`
        if let Some(requirement) = line.split_whitespace().next() {
            deps.push(requirement.to_string());
        }
    }

    deps
}

fn is_bundled(package: &str) -> bool {
    BUNDLED_PACKAGES.contains(&package)
}
