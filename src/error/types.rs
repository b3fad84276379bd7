use thiserror::Error;

/// Unified result type for the masonry layout crate.
pub type Result<T> = std::result::Result<T, MasonryError>;

/// Errors surfaced while building or driving the layout engine.
#[derive(Debug, Error)]
pub enum MasonryError {
    #[error("container `{0}` not found")]
    ContainerNotFound(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("style sink error: {0}")]
    Sink(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
