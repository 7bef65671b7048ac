//! Tests for pluggable value codecs

use kvlite::{Codec, Config, KvError, Store};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tempfile::TempDir;

/// JSON codec that stores pretty-printed text
struct PrettyJsonCodec;

impl Codec for PrettyJsonCodec {
    fn encode<V: Serialize>(&self, value: &V) -> kvlite::Result<String> {
        serde_json::to_string_pretty(value).map_err(|e| KvError::Encode(e.to_string()))
    }

    fn decode<V: DeserializeOwned>(&self, text: &str) -> kvlite::Result<V> {
        serde_json::from_str(text).map_err(|e| KvError::Decode {
            key: String::new(),
            reason: e.to_string(),
        })
    }
}

#[test]
fn test_custom_codec_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("kvs.db"))
        .build();
    let store = Store::open_with_codec(config, PrettyJsonCodec).unwrap();

    store.set("key", &json!({"a": 1, "b": [2, 3]})).unwrap();

    let loaded: Option<serde_json::Value> = store.get("key").unwrap();
    assert_eq!(loaded, Some(json!({"a": 1, "b": [2, 3]})));

    // Stored text really is the pretty form
    let record = store.record("key").unwrap().unwrap();
    assert!(record.value.unwrap().contains('\n'));
}

#[test]
fn test_codecs_interoperate_on_shared_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("kvs.db");

    let writer = Store::open_with_codec(
        Config::builder().path(&path).build(),
        PrettyJsonCodec,
    )
    .unwrap();
    writer.set("key", &json!({"n": 1})).unwrap();
    writer.close().unwrap();

    // The default compact codec reads pretty-printed JSON just fine
    let reader = Store::open_path(&path).unwrap();
    assert_eq!(
        reader.get::<serde_json::Value>("key").unwrap(),
        Some(json!({"n": 1}))
    );
}
