//! Set membership over serialized objects.
//!
//! Members are stored in their encoded form, so uniqueness is decided by
//! serialized-value equality: two values whose JSON texts match are the
//! same member, whatever their in-memory types. Field order in the
//! encoding therefore matters; values written by this crate encode
//! deterministically, but hand-written payloads with reordered fields
//! would be distinct members.

use crate::codec;
use crate::errors::{require_nonempty, Error, Result};
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::{debug, error, instrument};

/// Set facade over a shared store.
#[derive(Clone)]
pub struct SetStore<S> {
    store: S,
}

impl<S: Store> SetStore<S> {
    /// Create a set facade.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Encode `value` and add it to the set at `key`.
    ///
    /// Returns 1 if the member was new, 0 if it was already present.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn add<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<u64> {
        require_nonempty("key", key)?;

        let member = self.encode_member(key, value)?;
        let added = self.store.sadd(key, &[member]).await?;
        debug!(target: "storekeep.set", key = %key, added = added, "Added member");
        Ok(added)
    }

    /// Encode and add a batch of members.
    ///
    /// Returns how many members were newly added (duplicates within the
    /// batch or with existing members do not count).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`](crate::Error::Precondition) on an
    /// empty batch, and [`Error::Codec`](crate::Error::Codec) if any
    /// element fails to encode (nothing is written in that case).
    #[instrument(skip_all, fields(key = %key, batch = values.len()))]
    pub async fn add_all<T: Serialize>(&self, key: &str, values: &[T]) -> Result<u64> {
        require_nonempty("key", key)?;

        if values.is_empty() {
            return Err(Error::precondition("member batch must not be empty"));
        }

        let mut members = Vec::with_capacity(values.len());
        for value in values {
            members.push(self.encode_member(key, value)?);
        }

        let added = self.store.sadd(key, &members).await?;
        debug!(
            target: "storekeep.set",
            key = %key,
            offered = members.len(),
            added = added,
            "Added members"
        );
        Ok(added)
    }

    /// Encode `value` and remove it from the set at `key`.
    ///
    /// Returns 1 if the member was present, 0 otherwise.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn remove<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<u64> {
        require_nonempty("key", key)?;

        let member = self.encode_member(key, value)?;
        let removed = self.store.srem(key, &member).await?;
        debug!(target: "storekeep.set", key = %key, removed = removed, "Removed member");
        Ok(removed)
    }

    /// Encode `value` and test membership.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn contains<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<bool> {
        require_nonempty("key", key)?;

        let member = self.encode_member(key, value)?;
        Ok(self.store.sismember(key, &member).await?)
    }

    /// Cardinality of the set at `key` (0 if the key is absent).
    #[instrument(skip_all, fields(key = %key))]
    pub async fn count(&self, key: &str) -> Result<u64> {
        require_nonempty("key", key)?;
        Ok(self.store.scard(key).await?)
    }

    /// Read and decode every member.
    ///
    /// Returns an empty set if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`](crate::Error::Codec) on the first member
    /// that fails to decode; the whole read is aborted.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn read_all<T>(&self, key: &str) -> Result<HashSet<T>>
    where
        T: DeserializeOwned + Eq + Hash,
    {
        require_nonempty("key", key)?;

        let members = self.store.smembers(key).await?;
        let mut decoded = HashSet::with_capacity(members.len());
        for raw in &members {
            let value = codec::decode(raw).map_err(|e| {
                error!(
                    target: "storekeep.set",
                    key = %key,
                    error = %e,
                    "Failed to decode set member"
                );
                e
            })?;
            decoded.insert(value);
        }
        Ok(decoded)
    }

    fn encode_member<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<String> {
        codec::encode(value).map_err(|e| {
            error!(
                target: "storekeep.set",
                key = %key,
                error = %e,
                "Failed to encode set member"
            );
            e
        })
    }
}
