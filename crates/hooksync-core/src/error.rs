use thiserror::Error;

/// Errors raised while running the dependency resolver.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// Resolver exited with a non-zero status.
    ///
    /// The message is the resolver's error output, unmodified.
    #[error("{stderr}")]
    Failed { stderr: String },

    /// Resolver process could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading, updating or writing the pre-commit config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No hook with the requested id exists in any repo
    #[error("{hook_id} hook not found in pre-commit config")]
    HookNotFound { hook_id: String },

    /// YAML syntax error
    #[error("Failed to parse pre-commit config: {message}")]
    Parse { message: String },

    /// Document parsed but does not have the `repos`/`hooks` shape
    #[error("Invalid pre-commit config structure: {message}")]
    InvalidStructure { message: String },

    /// A node cannot be written back as YAML
    #[error("Failed to serialize pre-commit config: {message}")]
    Emit { message: String },
}

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ResolutionError {
    /// Create a failure from the resolver's captured error output.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self::Failed {
            stderr: stderr.into(),
        }
    }

    /// Create a spawn error for the given program.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

impl ConfigError {
    pub fn hook_not_found(hook_id: impl Into<String>) -> Self {
        Self::HookNotFound {
            hook_id: hook_id.into(),
        }
    }

    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    pub fn emit(message: impl Into<String>) -> Self {
        Self::Emit {
            message: message.into(),
        }
    }
}
