//! TTL-bounded advisory lock.
//!
//! A lock is a plain store key: present means held, absent means free.
//! [`Lock::acquire`] runs a three-step protocol against the store:
//!
//! 1. **Probe**: read the key's remaining TTL. A positive TTL means the
//!    lock is held by someone whose hold time has not elapsed; the call
//!    returns `false` without touching the key.
//! 2. **Claim**: if the key is missing or has no expiry, attempt a
//!    set-if-absent of the owner token. The store's set-if-absent is the
//!    only atomic guard in the protocol.
//! 3. **Stamp**: on a successful claim, stamp the key with the configured
//!    hold time so an owner that crashes cannot hold the lock forever.
//!    A pre-existing key *without* expiry is also stamped, even when the
//!    claim step reports it was created by someone else: a permanent lock
//!    key is always a leak from a crashed stamp step, and whoever notices
//!    it puts it back on a timer.
//!
//! `acquire` returns `true` when the claim succeeded or when it healed a
//! permanent key. The two outcomes are deliberately not distinguished;
//! callers that need to know which happened must inspect the key's value
//! themselves.
//!
//! # Caveats
//!
//! - The probe and the claim are two separate round trips. Two callers
//!   can both observe "free"; the set-if-absent then decides the winner,
//!   but the probe result is already stale by that point.
//! - [`Lock::release`] deletes the key unconditionally and always
//!   returns `true`. The owner token is recorded for diagnostics only;
//!   any caller that knows the key name can release the lock.

use crate::config::DEFAULT_LOCK_HOLD_SECONDS;
use crate::errors::{require_nonempty, Result};
use crate::store::{KeyTtl, Store};
use std::time::Duration;
use tracing::{debug, instrument};

/// Advisory lock over a shared store.
///
/// Cheap to clone when the store is; holds no state besides the store
/// handle and the configured hold time.
#[derive(Clone)]
pub struct Lock<S> {
    store: S,
    hold: Duration,
}

impl<S: Store> Lock<S> {
    /// Create a lock facade with the default hold time
    /// ([`DEFAULT_LOCK_HOLD_SECONDS`]).
    pub fn new(store: S) -> Self {
        Self::with_hold(store, Duration::from_secs(DEFAULT_LOCK_HOLD_SECONDS))
    }

    /// Create a lock facade with a custom hold time.
    ///
    /// The hold time bounds how long a crashed owner can keep a lock;
    /// it is not a lease that the facade renews.
    pub fn with_hold(store: S, hold: Duration) -> Self {
        Self { store, hold }
    }

    /// Try to acquire the lock named `key` on behalf of `owner`.
    ///
    /// Returns `true` if this call claimed the lock (or healed a
    /// permanent key, see the module docs), `false` if the lock is held
    /// by someone else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`](crate::Error::Precondition) if
    /// `key` or `owner` is empty, and propagates store failures.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn acquire(&self, key: &str, owner: &str) -> Result<bool> {
        require_nonempty("key", key)?;
        require_nonempty("owner token", owner)?;

        let probe = self.store.ttl(key).await?;
        match probe {
            KeyTtl::Remaining(remaining) => {
                debug!(
                    target: "storekeep.lock",
                    key = %key,
                    remaining_ms = remaining.as_millis() as u64,
                    "Lock held elsewhere"
                );
                Ok(false)
            }
            KeyTtl::NotFound | KeyTtl::NoExpiry => {
                let created = self.store.set_nx(key, owner).await?;
                let healed = probe == KeyTtl::NoExpiry;
                let acquired = created || healed;

                if acquired {
                    // Stamp whatever value is present; on the heal branch
                    // that may be another owner's token.
                    let stamped = self.store.expire(key, self.hold).await?;
                    debug!(
                        target: "storekeep.lock",
                        key = %key,
                        owner = %owner,
                        created = created,
                        healed = healed,
                        stamped = stamped,
                        "Lock acquired"
                    );
                } else {
                    debug!(target: "storekeep.lock", key = %key, "Lost acquire race");
                }

                Ok(acquired)
            }
        }
    }

    /// Release the lock named `key`.
    ///
    /// Deletes the key unconditionally and always returns `true`,
    /// whether or not `owner` holds the lock or the key exists at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`](crate::Error::Precondition) if
    /// `key` or `owner` is empty, and propagates store failures.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn release(&self, key: &str, owner: &str) -> Result<bool> {
        require_nonempty("key", key)?;
        require_nonempty("owner token", owner)?;

        let removed = self.store.del(&[key.to_string()]).await?;
        debug!(
            target: "storekeep.lock",
            key = %key,
            owner = %owner,
            removed = removed,
            "Lock released"
        );
        Ok(true)
    }
}
