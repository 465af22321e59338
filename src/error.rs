use thiserror::Error;

/// Unified error type for git-ccs operations
#[derive(Error, Debug)]
pub enum CcsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience type alias for Results in git-ccs
pub type Result<T> = std::result::Result<T, CcsError>;

impl CcsError {
    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        CcsError::Validation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        CcsError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        CcsError::Tag(msg.into())
    }

    /// Whether this error was raised while validating a value at construction time
    pub fn is_validation(&self) -> bool {
        matches!(self, CcsError::Validation(_))
    }
}
