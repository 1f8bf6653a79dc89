//! Redis cache backend using a connection manager for pooling.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use super::{Cache, CacheError};

pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Connect to Redis at `url` (e.g. "redis://localhost:6379/1").
    pub async fn connect(url: &str, default_ttl: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn, default_ttl })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let seconds = ttl.unwrap_or(self.default_ttl).as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // DEL of a non-existent key is a no-op on the server side.
        conn.del::<_, ()>(key).await.map_err(map_redis_error)
    }

    async fn close(&self) -> Result<(), CacheError> {
        // The connection manager multiplexes one connection that is torn down
        // on drop; nothing to flush.
        Ok(())
    }
}

fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}
