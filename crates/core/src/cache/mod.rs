//! Cache layer.
//!
//! - [`CacheStore`] - byte-level key-value store with TTL
//! - [`MemoryCacheStore`] - in-process store
//! - [`CacheService`] - typed, fault-tolerant cache-aside front with key derivation

mod errors;
mod memory;
mod service;
mod store;

pub use errors::CacheError;
pub use memory::MemoryCacheStore;
pub use service::{CacheService, DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_TTL};
pub use store::CacheStore;
