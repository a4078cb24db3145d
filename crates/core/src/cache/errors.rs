use thiserror::Error;

/// Errors raised by a cache backend or by (de)serializing cached values.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Failed to serialize cached value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
