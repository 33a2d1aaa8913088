//! JSON codec boundary.
//!
//! All values cross into the store as JSON text produced here, and come
//! back through here. The rest of the crate never touches `serde_json`
//! directly, so the wire representation can be reasoned about in one
//! place.
//!
//! # Decode Tolerance
//!
//! Decoding is lenient by contract:
//!
//! - Fields present in the payload but absent from the target type are
//!   ignored, so readers keep working when writers add fields.
//! - Missing optional fields decode to their `None`/default form.
//! - RFC 3339 timestamps are accepted with either `Z` or explicit
//!   offsets.
//!
//! Anything else (wrong shape, missing required field, malformed JSON)
//! surfaces as [`Error::Codec`](crate::Error::Codec).

use crate::errors::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value to its JSON text form.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Encode a value to JSON bytes.
pub fn encode_to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a value from JSON text.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

/// Decode a value from JSON bytes.
pub fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Re-shape a value through its JSON form.
///
/// Useful for narrowing a loosely-typed value (e.g. a map decoded from a
/// message payload) into a concrete type without an intermediate string.
pub fn convert<S: Serialize + ?Sized, T: DeserializeOwned>(value: &S) -> Result<T> {
    let intermediate = serde_json::to_value(value)?;
    Ok(serde_json::from_value(intermediate)?)
}

/// Whether `text` is the codec's encoding of an absent value.
pub(crate) fn is_null_repr(text: &str) -> bool {
    text == "null"
}
