//! Store abstraction.
//!
//! [`Store`] is the seam between the facade components and the backing
//! key-value store. The production backend is [`RedisStore`]; tests swap in
//! an in-memory implementation with the same command semantics.
//!
//! The trait mirrors the store's own command families (scalar, list, set)
//! rather than inventing a higher-level interface. Everything above this
//! layer works in terms of keys and already-serialized text payloads; the
//! trait never sees application types.

pub mod redis;

pub use redis::RedisStore;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Remaining lifetime of a key, as reported by the store.
///
/// The store's TTL probe folds three distinct states into one reply:
/// the key may be missing, may exist without an expiry, or may have a
/// bounded remaining lifetime. The lock protocol branches on all three,
/// so they are kept apart here instead of being collapsed into an
/// `Option<Duration>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist.
    NotFound,
    /// The key exists but carries no expiry.
    NoExpiry,
    /// The key exists and expires after the contained duration.
    ///
    /// Millisecond precision; the store rounds up sub-millisecond
    /// remainders.
    Remaining(Duration),
}

/// Error from a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the connection was lost.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store rejected or failed a command.
    #[error("command error: {0}")]
    Command(String),

    /// A positional list write addressed an index outside the list.
    #[error("index {index} out of range for key {key}")]
    IndexOutOfRange {
        /// Key of the list that was addressed.
        key: String,
        /// The rejected index.
        index: i64,
    },
}

/// Key-value store commands used by the facade.
///
/// Implementations must follow Redis command semantics:
///
/// - Range bounds (`lrange`, `ltrim`) are inclusive on both ends, and
///   negative indices count from the tail (`-1` is the last element).
/// - Reading a missing key yields an absent result (`None`, an empty
///   vector, zero), never an error.
/// - List and set keys are removed by the store once their last element
///   is gone.
/// - Batch commands (`del`, `lpush`, `sadd`) require at least one
///   argument; callers guard against empty batches.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the raw text at `key`. `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` at `key`, replacing any previous value.
    ///
    /// With `ttl` set, the key expires after the given duration
    /// (millisecond precision). Without it, the key persists until
    /// deleted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Write `value` at `key` only if the key does not already exist.
    ///
    /// Returns `true` if this call created the key. A pre-existing key
    /// is left untouched, whatever its value or expiry.
    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Delete the given keys, returning how many existed.
    async fn del(&self, keys: &[String]) -> Result<u64, StoreError>;

    /// Whether `key` currently exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Probe the remaining lifetime of `key`. See [`KeyTtl`].
    async fn ttl(&self, key: &str) -> Result<KeyTtl, StoreError>;

    /// Set or refresh the expiry on an existing key.
    ///
    /// Returns `false` without side effects if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Push `values` onto the head of the list at `key`, in argument
    /// order (the last argument ends up at index 0). Creates the list
    /// if missing. Returns the resulting list length.
    async fn lpush(&self, key: &str, values: &[String]) -> Result<u64, StoreError>;

    /// Read elements at positions `[start, stop]`, both inclusive.
    /// Out-of-range positions are clamped; a missing key yields an
    /// empty vector.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError>;

    /// Discard every element outside positions `[start, stop]`.
    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), StoreError>;

    /// Read the element at `index`. `None` if the key is missing or the
    /// index is out of range.
    async fn lindex(&self, key: &str, index: i64) -> Result<Option<String>, StoreError>;

    /// Overwrite the element at `index`.
    ///
    /// Fails with [`StoreError::IndexOutOfRange`] if the index is
    /// outside the current list, and [`StoreError::Command`] if the key
    /// does not exist.
    async fn lset(&self, key: &str, index: i64, value: &str) -> Result<(), StoreError>;

    /// Remove occurrences of `value` from the list at `key`.
    ///
    /// `count > 0` removes up to `count` matches from the head,
    /// `count < 0` from the tail, `count == 0` all matches. Returns the
    /// number removed.
    async fn lrem(&self, key: &str, count: i64, value: &str) -> Result<u64, StoreError>;

    /// Add `members` to the set at `key`, creating it if missing.
    /// Returns how many members were newly added (duplicates do not
    /// count).
    async fn sadd(&self, key: &str, members: &[String]) -> Result<u64, StoreError>;

    /// Remove `member` from the set at `key`. Returns 1 if it was
    /// present, 0 otherwise.
    async fn srem(&self, key: &str, member: &str) -> Result<u64, StoreError>;

    /// All members of the set at `key`, in no particular order.
    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Cardinality of the set at `key` (0 if the key is missing).
    async fn scard(&self, key: &str) -> Result<u64, StoreError>;

    /// Whether `member` is in the set at `key`.
    async fn sismember(&self, key: &str, member: &str) -> Result<bool, StoreError>;
}
