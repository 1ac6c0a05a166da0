use thiserror::Error;

/// Top-level error type for Runway collaborators.
///
/// Catalog and store implementations report failures through this type.
/// The admission crate wraps it with `#[from]` so `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunwayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid action reference: {0}")]
    InvalidReference(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for RunwayError {
    fn from(err: toml::de::Error) -> Self {
        RunwayError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RunwayError {
    fn from(err: toml::ser::Error) -> Self {
        RunwayError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RunwayError {
    fn from(err: serde_json::Error) -> Self {
        RunwayError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Runway operations.
pub type Result<T> = std::result::Result<T, RunwayError>;
