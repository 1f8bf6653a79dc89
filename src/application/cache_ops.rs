//! Best-effort cache access for the services.
//!
//! Cache calls are fire-and-forget relative to the database transaction: a
//! failing read degrades to a miss, a failing write or invalidation is
//! logged and skipped. No cache error ever aborts a request or rolls back
//! a transaction.

use metrics::counter;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::cache::Cache;

pub(crate) async fn fetch<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                counter!("carta_cache_hit_total").increment(1);
                Some(value)
            }
            Err(err) => {
                warn!(key, error = %err, "cached payload failed to deserialize; treating as miss");
                None
            }
        },
        Ok(None) => {
            counter!("carta_cache_miss_total").increment(1);
            None
        }
        Err(err) => {
            warn!(key, error = %err, "cache read failed; treating as miss");
            None
        }
    }
}

pub(crate) async fn store<T: Serialize>(cache: &dyn Cache, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key, error = %err, "failed to serialize value for cache");
            return;
        }
    };
    if let Err(err) = cache.set(key, &raw, None).await {
        warn!(key, error = %err, "cache write failed; skipping population");
    }
}

pub(crate) async fn invalidate(cache: &dyn Cache, keys: &[&str]) {
    for key in keys {
        match cache.delete(key).await {
            Ok(()) => counter!("carta_cache_invalidate_total").increment(1),
            Err(err) => warn!(key, error = %err, "cache invalidation failed; skipping key"),
        }
    }
}
