//! # Storekeep Test Utilities
//!
//! Shared test support for the storekeep facade.
//!
//! This crate provides an in-memory store double and test fixtures for
//! isolated facade testing without requiring a live Redis.
//!
//! ## Modules
//!
//! - `memory_store` - in-memory [`storekeep::Store`] with virtual-clock expiry
//! - `fixtures` - pre-configured application-shaped records
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storekeep::Cache;
//! use storekeep_test_utils::{MemoryStore, SessionRecord};
//!
//! #[tokio::test(start_paused = true)]
//! async fn test_example() {
//!     let store = MemoryStore::new();
//!     let cache = Cache::new(store);
//!
//!     cache.put("sessions:1", &SessionRecord::sample(1)).await.unwrap();
//!
//!     // Advance the clock past the TTL and watch the entry vanish
//!     tokio::time::advance(std::time::Duration::from_secs(3601)).await;
//!     let hit: Option<SessionRecord> = cache.get("sessions:1").await.unwrap();
//!     assert!(hit.is_none());
//! }
//! ```

pub mod fixtures;
pub mod memory_store;

// Re-export commonly used items
pub use fixtures::*;
pub use memory_store::MemoryStore;
