//! Storekeep - coordination and caching facade over a shared key-value store.
//!
//! This library gives application code four primitives built on one store
//! connection, with all values carried as JSON:
//!
//! - [`Lock`] - a best-effort, TTL-bounded distributed mutex
//! - [`Cache`] - typed get/put of serialized objects with expiry
//! - [`BoundedList`] - a capped, ordered sequence per key (push-then-trim)
//! - [`SetStore`] - per-key set membership over serialized objects
//!
//! # Architecture
//!
//! Every facade component holds a [`Store`] handle and nothing else; all
//! shared mutable state lives in the remote store. The components are
//! independent of each other and safe for concurrent use from any number
//! of tasks - exclusion is delegated entirely to the store's per-command
//! atomicity.
//!
//! ```text
//! application code
//!       |
//!   Lock / Cache / BoundedList / SetStore
//!       |            (Cache, BoundedList and SetStore pass values
//!       |             through the JSON codec; Lock stores raw tokens)
//!     Store trait
//!       |
//!   RedisStore (production) or MemoryStore (tests)
//! ```
//!
//! # Key Design Decisions
//!
//! - **Injected store handle**: components take their store at
//!   construction instead of reaching for a process-wide connection, so
//!   tests can swap in an in-memory backend per test case.
//! - **No retries**: store and codec failures propagate to the caller
//!   unmodified. The facade adds no retry, backoff, or circuit breaking.
//! - **Absence is not an error**: missing keys surface as `None`, empty
//!   collections, or `false` - never as an `Err`.
//! - **Millisecond TTLs**: expiry plumbing uses the store's millisecond
//!   commands throughout, so sub-second lifetimes behave predictably.
//!
//! # Example
//!
//! ```rust,no_run
//! use storekeep::{Cache, Lock, RedisStore};
//!
//! # async fn demo() -> storekeep::Result<()> {
//! let store = RedisStore::new("redis://localhost:6379").await?;
//!
//! let lock = Lock::new(store.clone());
//! if lock.acquire("jobs:nightly-rollup", "worker-17").await? {
//!     // ... do the work ...
//!     lock.release("jobs:nightly-rollup", "worker-17").await?;
//! }
//!
//! let cache = Cache::new(store);
//! cache.put("user:42:motd", "welcome back").await?;
//! let motd: Option<String> = cache.get("user:42:motd").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`lock`] - lock protocol (probe, claim, stamp)
//! - [`cache`] - typed cache with TTL policy
//! - [`list`] - bounded list maintenance
//! - [`set`] - set membership
//! - [`store`] - store abstraction and the Redis backend
//! - [`codec`] - JSON boundary
//! - [`config`] - configuration from environment
//! - [`errors`] - error taxonomy

pub mod cache;
pub mod codec;
pub mod config;
pub mod errors;
pub mod list;
pub mod lock;
pub mod set;
pub mod store;

pub use cache::Cache;
pub use config::Config;
pub use errors::{Error, Result};
pub use list::BoundedList;
pub use lock::Lock;
pub use set::SetStore;
pub use store::{KeyTtl, RedisStore, Store, StoreError};
