//! Facade error types.
//!
//! Every public operation returns [`Result`]. The taxonomy is deliberately
//! small: callers mostly care whether a failure came from encoding/decoding
//! a value, from the store itself, or from their own arguments. Absence of
//! a key is never an error; lookups surface it as `None`, an empty
//! collection, or a `false` flag.

use crate::store::StoreError;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Facade error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A value could not be encoded to or decoded from its wire form.
    ///
    /// Raised when a stored payload does not parse as the requested type,
    /// or a value fails to serialize. The store itself is healthy.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The backing store failed or was unreachable.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The caller supplied arguments the operation cannot act on,
    /// such as an empty key or an empty member batch.
    #[error("precondition failed: {0}")]
    Precondition(String),
}

impl Error {
    /// Shorthand for a [`Error::Precondition`] with a formatted message.
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Error::Precondition(msg.into())
    }
}

/// Reject empty required arguments before any store round trip.
pub(crate) fn require_nonempty(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::precondition(format!("{what} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_from_serde() {
        let parse_err = serde_json::from_str::<u64>("not-a-number").unwrap_err();
        let err: Error = parse_err.into();

        assert!(matches!(err, Error::Codec(_)));
        assert!(err.to_string().starts_with("codec error:"));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Connection("refused".to_string());
        let err: Error = store_err.into();

        assert!(matches!(err, Error::Store(_)));
        assert_eq!(err.to_string(), "store error: connection error: refused");
    }

    #[test]
    fn test_precondition_display() {
        let err = Error::precondition("key must not be empty");
        assert_eq!(err.to_string(), "precondition failed: key must not be empty");
    }

    #[test]
    fn test_require_nonempty() {
        assert!(require_nonempty("key", "jobs:rollup").is_ok());

        let err = require_nonempty("key", "").unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert_eq!(err.to_string(), "precondition failed: key must not be empty");
    }
}
