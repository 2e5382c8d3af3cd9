use std::io;
use std::path::PathBuf;

/// Errors that can occur during tinkersan operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Malformed bootstrapper '{export}' in {}: missing {missing}", path.display())]
    MalformedVariant {
        path: PathBuf,
        export: String,
        missing: String,
    },

    #[error("Runner error: {0}")]
    RunnerError(String),
}

/// Result type alias for tinkersan operations
pub type Result<T> = std::result::Result<T, Error>;
