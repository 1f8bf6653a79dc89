//! Side-cache port and its implementations.
//!
//! The cache holds serialized response projections keyed by the strings in
//! [`keys`]. Reads populate it, writes delete the affected keys; it is never
//! the source of truth. Three variants satisfy the same contract: Redis for
//! production, a null object when caching is disabled, and an in-process map
//! for tests.

pub mod keys;
mod memory;
mod null;
mod redis;

pub use memory::MemoryCache;
pub use null::NullCache;
pub use redis::RedisCache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("cache operation failed: {0}")]
    OperationFailed(String),
}

/// Capability interface over a TTL key-value store.
///
/// `get` of a missing key and `delete` of an absent key are no-ops, never
/// errors. `set` always applies a TTL: the supplied one, or the
/// implementation's configured default when `None`.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Release the backing connection; the in-memory variant resets to empty.
    async fn close(&self) -> Result<(), CacheError>;
}
