//! Value codec
//!
//! The store persists values as text and is agnostic to their shape beyond
//! "round-trips through the codec". The default codec is JSON; alternative
//! text encodings plug in through the [`Codec`] trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{KvError, Result};

/// Reversible text encoding for stored values
pub trait Codec {
    /// Serialize a value to its stored text form
    fn encode<V: Serialize>(&self, value: &V) -> Result<String>;

    /// Deserialize a value from its stored text form
    ///
    /// Decode failures are reported as [`KvError::Decode`]; the store fills
    /// in the key of the offending record before surfacing the error.
    fn decode<V: DeserializeOwned>(&self, text: &str) -> Result<V>;
}

/// JSON codec backed by serde_json (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<V: Serialize>(&self, value: &V) -> Result<String> {
        serde_json::to_string(value).map_err(|e| KvError::Encode(e.to_string()))
    }

    fn decode<V: DeserializeOwned>(&self, text: &str) -> Result<V> {
        serde_json::from_str(text).map_err(|e| KvError::Decode {
            key: String::new(),
            reason: e.to_string(),
        })
    }
}
