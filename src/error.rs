//! Error types for the tactiq crate

use thiserror::Error;

/// Main error type for the tactiq crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("no legal actions available")]
    EmptyActionSet,

    #[error("game already over")]
    GameOver,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
