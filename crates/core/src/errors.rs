//! Core error types for TokenPulse.
//!
//! The public aggregation contracts never return these: every failure is
//! logged and degraded at the service boundary. They exist for the
//! fallible building blocks underneath (cache store, cursor decoding).

use thiserror::Error;

use crate::cache::CacheError;
use crate::query::CursorError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cache operation failed: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid cursor: {0}")]
    Cursor(#[from] CursorError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] tokenpulse_market_data::MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
