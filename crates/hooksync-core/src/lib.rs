//! Core building blocks for synchronizing a pre-commit mypy hook with a
//! resolved dependency group.
//!
//! The crate is split along the pipeline:
//!
//! - [`requirements`] turns resolver output into a dependency list
//! - [`resolver`] defines the [`DependencyResolver`] seam
//! - [`loader`] reads YAML the way pre-commit's YAML 1.1 reader types it
//! - [`document`] holds the typed pre-commit document and the hook updater
//! - [`emitter`] serializes a YAML tree according to [`EmitSettings`]

pub mod document;
pub mod emitter;
pub mod error;
pub mod loader;
pub mod requirements;
pub mod resolver;

pub use document::{
    HookEntry, PreCommitConfig, RepoEntry, TARGET_HOOK_ID, update_additional_dependencies,
};
pub use emitter::{EmitSettings, emit_yaml};
pub use error::{ConfigError, ResolutionError};
pub use loader::load_documents;
pub use requirements::{BUNDLED_PACKAGES, parse_pinned_requirements};
pub use resolver::{DependencyResolver, resolve_dependencies};
