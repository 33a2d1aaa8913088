//! Typed object cache with expiry.
//!
//! Values are encoded through the [`codec`] on the way in and decoded on
//! the way out; the store only ever sees JSON text. Every write carries a
//! TTL - the module default of one hour unless the caller picks one - so
//! cache entries are always self-cleaning.
//!
//! A missing key is an ordinary outcome: [`Cache::get`] returns `None`
//! and [`Cache::has_key`] returns `false`. Only a present-but-undecodable
//! value is an error, because it means the writer and reader disagree
//! about the type stored at that key.

use crate::codec;
use crate::config::DEFAULT_CACHE_TTL_SECONDS;
use crate::errors::{require_nonempty, Result};
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Typed cache over a shared store.
#[derive(Clone)]
pub struct Cache<S> {
    store: S,
    default_ttl: Duration,
}

impl<S: Store> Cache<S> {
    /// Create a cache facade with the default entry TTL
    /// ([`DEFAULT_CACHE_TTL_SECONDS`]).
    pub fn new(store: S) -> Self {
        Self::with_default_ttl(store, Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }

    /// Create a cache facade with a custom default entry TTL.
    pub fn with_default_ttl(store: S, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Read and decode the value at `key`.
    ///
    /// Returns `None` if the key does not exist (or has expired).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`](crate::Error::Codec) if the stored value
    /// does not decode as `T`.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        require_nonempty("key", key)?;

        match self.store.get(key).await? {
            Some(raw) => {
                let value = codec::decode(&raw).map_err(|e| {
                    error!(
                        target: "storekeep.cache",
                        key = %key,
                        error = %e,
                        "Failed to decode cached value"
                    );
                    e
                })?;
                debug!(target: "storekeep.cache", key = %key, "Cache hit");
                Ok(Some(value))
            }
            None => {
                debug!(target: "storekeep.cache", key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    /// Encode and store `value` at `key` with the default TTL.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.put_with_ttl(key, value, self.default_ttl).await
    }

    /// Encode and store `value` at `key` with a caller-chosen TTL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`](crate::Error::Codec) if `value` fails to
    /// encode; nothing is written in that case.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn put_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        require_nonempty("key", key)?;

        let encoded = codec::encode(value).map_err(|e| {
            error!(
                target: "storekeep.cache",
                key = %key,
                error = %e,
                "Failed to encode value for cache"
            );
            e
        })?;

        self.store.set(key, &encoded, Some(ttl)).await?;
        debug!(
            target: "storekeep.cache",
            key = %key,
            ttl_ms = ttl.as_millis() as u64,
            "Cached value"
        );
        Ok(())
    }

    /// Delete the given keys, returning how many existed.
    ///
    /// Deleting a missing key is not an error; an empty batch is a no-op.
    #[instrument(skip_all, fields(count = keys.len()))]
    pub async fn delete_keys(&self, keys: &[&str]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let owned: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
        let removed = self.store.del(&owned).await?;
        debug!(
            target: "storekeep.cache",
            requested = keys.len(),
            removed = removed,
            "Deleted cache entries"
        );
        Ok(removed)
    }

    /// Whether `key` currently exists.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn has_key(&self, key: &str) -> Result<bool> {
        require_nonempty("key", key)?;
        Ok(self.store.exists(key).await?)
    }

    /// Set or refresh the TTL on an existing entry.
    ///
    /// Returns `false` without side effects if the key is absent.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        require_nonempty("key", key)?;

        let applied = self.store.expire(key, ttl).await?;
        debug!(
            target: "storekeep.cache",
            key = %key,
            ttl_ms = ttl.as_millis() as u64,
            applied = applied,
            "Refreshed entry TTL"
        );
        Ok(applied)
    }
}
