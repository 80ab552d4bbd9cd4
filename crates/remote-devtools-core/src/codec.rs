//! Payload codec boundary.
//!
//! Parameters and results cross the executor as encoded JSON bytes.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Encoded command parameters, result payloads and event parameters.
pub type RawMessage = Bytes;

/// Encode a value into a raw payload.
///
/// # Errors
/// Returns [`Error::Encode`] if serialization fails.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<RawMessage> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Error::Encode)
}

/// Decode a raw payload into a typed value.
///
/// # Errors
/// Returns [`Error::Decode`] if the payload does not match `T`.
pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T> {
    serde_json::from_slice(raw).map_err(Error::Decode)
}
