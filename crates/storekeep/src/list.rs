//! Capacity-bounded list.
//!
//! A store-native list doubles as a ring buffer: new batches are pushed
//! onto the head, then the list is trimmed back to its declared bound.
//! Since the store has no "capped push" primitive, the push and the trim
//! are two separate commands; a reader between them can briefly observe
//! an over-long list.
//!
//! # Range Convention
//!
//! All bounds are inclusive store ranges. A list declared with bound `L`
//! is trimmed to positions `[0, L]` and read back the same way, so it
//! carries up to `L + 1` elements, newest first. Long-standing callers
//! size their bounds around this, so both read and trim keep the same
//! convention rather than anyone "fixing" one side of it.

use crate::codec;
use crate::errors::{require_nonempty, Result};
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, instrument};

/// Bounded list over a shared store.
#[derive(Clone)]
pub struct BoundedList<S> {
    store: S,
}

impl<S: Store> BoundedList<S> {
    /// Create a bounded-list facade.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read and decode every retained element, newest first.
    ///
    /// Returns an empty vector if the key does not exist. Otherwise
    /// reads positions `[0, length]` inclusive (see the module docs for
    /// the off-by-one this implies) and decodes each element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`](crate::Error::Codec) on the first
    /// element that fails to decode; the whole read is aborted.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn read_all<T: DeserializeOwned>(&self, key: &str, length: i64) -> Result<Vec<T>> {
        require_nonempty("key", key)?;

        if !self.store.exists(key).await? {
            return Ok(Vec::new());
        }

        let elements = self.store.lrange(key, 0, length).await?;
        let mut decoded = Vec::with_capacity(elements.len());
        for raw in &elements {
            let value = codec::decode(raw).map_err(|e| {
                error!(
                    target: "storekeep.list",
                    key = %key,
                    error = %e,
                    "Failed to decode list element"
                );
                e
            })?;
            decoded.push(value);
        }
        Ok(decoded)
    }

    /// Encode and push a batch, then trim the list back to its bound.
    ///
    /// The batch is pushed head-first, so its last element ends up at
    /// index 0 and the previous contents follow. An empty batch is a
    /// complete no-op (no push, no trim).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`](crate::Error::Codec) if any element
    /// fails to encode; nothing is pushed in that case.
    #[instrument(skip_all, fields(key = %key, batch = values.len()))]
    pub async fn push_all<T: Serialize>(&self, key: &str, length: i64, values: &[T]) -> Result<()> {
        require_nonempty("key", key)?;

        if values.is_empty() {
            return Ok(());
        }

        // Encode the whole batch up front so a codec failure cannot
        // leave a partial push behind.
        let mut encoded = Vec::with_capacity(values.len());
        for value in values {
            let text = codec::encode(value).map_err(|e| {
                error!(
                    target: "storekeep.list",
                    key = %key,
                    error = %e,
                    "Failed to encode list element"
                );
                e
            })?;
            encoded.push(text);
        }

        let list_len = self.store.lpush(key, &encoded).await?;
        self.store.ltrim(key, 0, length).await?;
        debug!(
            target: "storekeep.list",
            key = %key,
            pushed = encoded.len(),
            len_before_trim = list_len,
            bound = length,
            "Pushed and trimmed"
        );
        Ok(())
    }

    /// Read and decode the element at `index`.
    ///
    /// Returns `None` if the key is missing, the index is out of range,
    /// or the stored element is empty text.
    #[instrument(skip_all, fields(key = %key, index = index))]
    pub async fn read_at<T: DeserializeOwned>(&self, key: &str, index: i64) -> Result<Option<T>> {
        require_nonempty("key", key)?;

        match self.store.lindex(key, index).await? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => {
                let value = codec::decode(&raw).map_err(|e| {
                    error!(
                        target: "storekeep.list",
                        key = %key,
                        index = index,
                        error = %e,
                        "Failed to decode list element"
                    );
                    e
                })?;
                Ok(Some(value))
            }
        }
    }

    /// Encode `value` and overwrite the element at `index`.
    ///
    /// Silently does nothing if `key` is empty or `value` encodes to the
    /// codec's null form (an absent value cannot replace an element).
    ///
    /// # Errors
    ///
    /// Returns a store error if `index` is outside the current list
    /// bounds or the key does not exist.
    #[instrument(skip_all, fields(key = %key, index = index))]
    pub async fn replace_at<T: Serialize + ?Sized>(
        &self,
        key: &str,
        index: i64,
        value: &T,
    ) -> Result<()> {
        if key.is_empty() {
            debug!(target: "storekeep.list", "Skipped replace on empty key");
            return Ok(());
        }

        let encoded = codec::encode(value).map_err(|e| {
            error!(
                target: "storekeep.list",
                key = %key,
                error = %e,
                "Failed to encode replacement element"
            );
            e
        })?;
        if codec::is_null_repr(&encoded) {
            debug!(
                target: "storekeep.list",
                key = %key,
                index = index,
                "Skipped replace with absent value"
            );
            return Ok(());
        }

        self.store.lset(key, index, &encoded).await?;
        debug!(
            target: "storekeep.list",
            key = %key,
            index = index,
            "Replaced element"
        );
        Ok(())
    }

    /// Remove occurrences of the literal stored text `raw` from the list.
    ///
    /// `count` follows the store's own remove primitive: positive counts
    /// remove from the head, negative from the tail, zero removes all.
    /// Returns the number of elements removed.
    #[instrument(skip_all, fields(key = %key, count = count))]
    pub async fn remove_value(&self, key: &str, count: i64, raw: &str) -> Result<u64> {
        require_nonempty("key", key)?;

        let removed = self.store.lrem(key, count, raw).await?;
        debug!(
            target: "storekeep.list",
            key = %key,
            count = count,
            removed = removed,
            "Removed elements"
        );
        Ok(removed)
    }
}
