pub mod app;
pub mod cli;
pub mod error;
pub mod sync;

// Re-export from hooksync-core
pub use hooksync_core::{
    ConfigError, DependencyResolver, EmitSettings, PreCommitConfig, ResolutionError,
    TARGET_HOOK_ID,
};

// Re-export from hooksync-uv
pub use hooksync_uv::{PreflightError, UvResolver};

pub use app::run;
pub use error::{Result, SyncError};
pub use sync::{SyncOptions, SyncOutcome, render_updated_config, sync_hook};
