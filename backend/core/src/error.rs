use thiserror::Error;

/// Top-level error type for the GlossBot runtime.
#[derive(Debug, Error)]
pub enum GlossError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("job dispatch failed: {0}")]
    Dispatch(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
