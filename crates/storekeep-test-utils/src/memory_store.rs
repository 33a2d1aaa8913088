//! In-memory [`Store`] with virtual-clock expiry.
//!
//! Implements the same command semantics as the Redis backend against
//! process-local state: inclusive ranges, negative tail-relative indices,
//! wrong-type rejection, and removal of list/set keys once their last
//! element is gone.
//!
//! Expiry runs on tokio's clock, so tests built with
//! `#[tokio::test(start_paused = true)]` can advance time with
//! `tokio::time::advance` and observe keys expiring deterministically.
//!
//! # Example
//!
//! ```rust,ignore
//! use storekeep_test_utils::MemoryStore;
//!
//! let store = MemoryStore::new()
//!     .with_value("user:1:motd", "\"hello\"")
//!     .with_list("recent:events", ["\"e2\"", "\"e1\""]);
//!
//! let cache = storekeep::Cache::new(store.clone());
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use storekeep::{KeyTtl, Store, StoreError};
use tokio::time::Instant;

/// One stored value, typed the way the store types it.
#[derive(Debug, Clone)]
enum Value {
    Scalar(String),
    List(VecDeque<String>),
    Set(HashSet<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
}

impl Inner {
    fn purge_expired(&mut self, now: Instant) {
        self.entries
            .retain(|_, entry| entry.expires_at.map_or(true, |at| at > now));
    }
}

fn wrong_type() -> StoreError {
    StoreError::Command(
        "WRONGTYPE Operation against a key holding the wrong kind of value".to_string(),
    )
}

fn arity_error(command: &str) -> StoreError {
    StoreError::Command(format!(
        "wrong number of arguments for '{command}' command"
    ))
}

/// Resolve an inclusive, possibly tail-relative range against a list of
/// `len` elements. `None` means the range selects nothing.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    let mut start = if start < 0 { len + start } else { start };
    let mut stop = if stop < 0 { len + stop } else { stop };
    if start < 0 {
        start = 0;
    }
    if stop >= len {
        stop = len - 1;
    }
    if start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// Resolve a single possibly tail-relative index. `None` when out of range.
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { len + index } else { index };
    if index < 0 || index >= len {
        None
    } else {
        Some(index as usize)
    }
}

/// In-memory store for tests.
///
/// Cloning shares the underlying state, mirroring how production code
/// clones one store handle into several facade components.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Seed a scalar key (no expiry). `raw` is the already-encoded text.
    #[must_use]
    pub fn with_value(self, key: &str, raw: &str) -> Self {
        {
            let mut inner = self.lock();
            inner.entries.insert(
                key.to_string(),
                Entry {
                    value: Value::Scalar(raw.to_string()),
                    expires_at: None,
                },
            );
        }
        self
    }

    /// Seed a list key. Elements are given in list order (index 0 first).
    /// An empty iterator seeds nothing, matching a store that never holds
    /// empty lists.
    #[must_use]
    pub fn with_list<I, T>(self, key: &str, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        {
            let elements: VecDeque<String> = elements.into_iter().map(Into::into).collect();
            if !elements.is_empty() {
                let mut inner = self.lock();
                inner.entries.insert(
                    key.to_string(),
                    Entry {
                        value: Value::List(elements),
                        expires_at: None,
                    },
                );
            }
        }
        self
    }

    /// Seed a set key. An empty iterator seeds nothing.
    #[must_use]
    pub fn with_set<I, T>(self, key: &str, members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        {
            let members: HashSet<String> = members.into_iter().map(Into::into).collect();
            if !members.is_empty() {
                let mut inner = self.lock();
                inner.entries.insert(
                    key.to_string(),
                    Entry {
                        value: Value::Set(members),
                        expires_at: None,
                    },
                );
            }
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Lock the state and purge anything the virtual clock says is dead.
    fn lock_live(&self) -> MutexGuard<'_, Inner> {
        let mut inner = self.lock();
        inner.purge_expired(Instant::now());
        inner
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.lock_live();
        match inner.entries.get(key) {
            None => Ok(None),
            Some(Entry {
                value: Value::Scalar(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut inner = self.lock_live();
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(value.to_string()),
                expires_at: ttl.map(|t| Instant::now() + t),
            },
        );
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock_live();
        if inner.entries.contains_key(key) {
            return Ok(false);
        }
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(value.to_string()),
                expires_at: None,
            },
        );
        Ok(true)
    }

    async fn del(&self, keys: &[String]) -> Result<u64, StoreError> {
        if keys.is_empty() {
            return Err(arity_error("del"));
        }
        let mut inner = self.lock_live();
        let mut removed = 0;
        for key in keys {
            if inner.entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let inner = self.lock_live();
        Ok(inner.entries.contains_key(key))
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl, StoreError> {
        let inner = self.lock_live();
        match inner.entries.get(key) {
            None => Ok(KeyTtl::NotFound),
            Some(Entry {
                expires_at: None, ..
            }) => Ok(KeyTtl::NoExpiry),
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => Ok(KeyTtl::Remaining(
                at.saturating_duration_since(Instant::now()),
            )),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut inner = self.lock_live();
        match inner.entries.get_mut(key) {
            None => Ok(false),
            Some(entry) => {
                entry.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
        }
    }

    async fn lpush(&self, key: &str, values: &[String]) -> Result<u64, StoreError> {
        if values.is_empty() {
            return Err(arity_error("lpush"));
        }
        let mut inner = self.lock_live();
        let entry = inner.entries.entry(key.to_string()).or_insert(Entry {
            value: Value::List(VecDeque::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::List(list) => {
                for value in values {
                    list.push_front(value.clone());
                }
                Ok(list.len() as u64)
            }
            _ => Err(wrong_type()),
        }
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        let inner = self.lock_live();
        let list = match inner.entries.get(key) {
            None => return Ok(Vec::new()),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => list,
            Some(_) => return Err(wrong_type()),
        };
        match resolve_range(list.len(), start, stop) {
            None => Ok(Vec::new()),
            Some((start, stop)) => Ok(list
                .iter()
                .skip(start)
                .take(stop - start + 1)
                .cloned()
                .collect()),
        }
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), StoreError> {
        let mut inner = self.lock_live();
        let list = match inner.entries.get_mut(key) {
            None => return Ok(()),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => list,
            Some(_) => return Err(wrong_type()),
        };
        match resolve_range(list.len(), start, stop) {
            None => {
                // Range selects nothing; the store drops the empty list.
                inner.entries.remove(key);
            }
            Some((start, stop)) => {
                let kept: VecDeque<String> = list
                    .iter()
                    .skip(start)
                    .take(stop - start + 1)
                    .cloned()
                    .collect();
                *list = kept;
            }
        }
        Ok(())
    }

    async fn lindex(&self, key: &str, index: i64) -> Result<Option<String>, StoreError> {
        let inner = self.lock_live();
        let list = match inner.entries.get(key) {
            None => return Ok(None),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => list,
            Some(_) => return Err(wrong_type()),
        };
        match resolve_index(list.len(), index) {
            None => Ok(None),
            Some(index) => Ok(list.get(index).cloned()),
        }
    }

    async fn lset(&self, key: &str, index: i64, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock_live();
        let list = match inner.entries.get_mut(key) {
            None => return Err(StoreError::Command("no such key".to_string())),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => list,
            Some(_) => return Err(wrong_type()),
        };
        match resolve_index(list.len(), index) {
            None => Err(StoreError::IndexOutOfRange {
                key: key.to_string(),
                index,
            }),
            Some(resolved) => {
                if let Some(slot) = list.get_mut(resolved) {
                    *slot = value.to_string();
                }
                Ok(())
            }
        }
    }

    async fn lrem(&self, key: &str, count: i64, value: &str) -> Result<u64, StoreError> {
        let mut inner = self.lock_live();
        let list = match inner.entries.get_mut(key) {
            None => return Ok(0),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => list,
            Some(_) => return Err(wrong_type()),
        };

        let limit = count.unsigned_abs() as usize;
        let unlimited = count == 0;
        let mut removed = 0usize;

        if count >= 0 {
            let mut kept = VecDeque::with_capacity(list.len());
            for item in list.iter() {
                if item == value && (unlimited || removed < limit) {
                    removed += 1;
                } else {
                    kept.push_back(item.clone());
                }
            }
            *list = kept;
        } else {
            let mut kept_rev = Vec::with_capacity(list.len());
            for item in list.iter().rev() {
                if item == value && removed < limit {
                    removed += 1;
                } else {
                    kept_rev.push(item.clone());
                }
            }
            kept_rev.reverse();
            *list = kept_rev.into();
        }

        if list.is_empty() {
            inner.entries.remove(key);
        }
        Ok(removed as u64)
    }

    async fn sadd(&self, key: &str, members: &[String]) -> Result<u64, StoreError> {
        if members.is_empty() {
            return Err(arity_error("sadd"));
        }
        let mut inner = self.lock_live();
        let entry = inner.entries.entry(key.to_string()).or_insert(Entry {
            value: Value::Set(HashSet::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::Set(set) => {
                let mut added = 0;
                for member in members {
                    if set.insert(member.clone()) {
                        added += 1;
                    }
                }
                Ok(added)
            }
            _ => Err(wrong_type()),
        }
    }

    async fn srem(&self, key: &str, member: &str) -> Result<u64, StoreError> {
        let mut inner = self.lock_live();
        let set = match inner.entries.get_mut(key) {
            None => return Ok(0),
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => set,
            Some(_) => return Err(wrong_type()),
        };
        let removed = u64::from(set.remove(member));
        if set.is_empty() {
            inner.entries.remove(key);
        }
        Ok(removed)
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.lock_live();
        match inner.entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn scard(&self, key: &str) -> Result<u64, StoreError> {
        let inner = self.lock_live();
        match inner.entries.get(key) {
            None => Ok(0),
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.len() as u64),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn sismember(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let inner = self.lock_live();
        match inner.entries.get(key) {
            None => Ok(false),
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.contains(member)),
            Some(_) => Err(wrong_type()),
        }
    }
}
