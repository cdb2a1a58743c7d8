//! [uv](https://github.com/astral-sh/uv) backend for hooksync.
//!
//! Provides [`UvResolver`], which runs `uv pip compile` for a
//! `pyproject.toml`, and the preflight checks that make sure a recent
//! enough `uv` is installed.

pub mod error;
pub mod resolver;
pub mod version;

pub use error::{PreflightError, Result};
pub use resolver::UvResolver;
pub use version::{MINIMUM_UV_VERSION, check_version, parse_version_output};
