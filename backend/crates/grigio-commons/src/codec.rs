//! Value codecs.
//!
//! A table never looks inside the values it stores. Everything it knows about
//! a value comes from a [`ValueCodec`]: `encode` may fail and that failure is
//! surfaced to the writer, while a failed `decode` is only a per-key miss.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use thiserror::Error;

/// Errors raised while encoding a value for storage.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Encode error: {0}")]
    Encode(String),
}

/// Converts domain values to and from stored bytes.
pub trait ValueCodec<V>: Send + Sync {
    /// Encodes a value into the bytes written to the engine.
    fn encode(&self, value: &V) -> Result<Vec<u8>, CodecError>;

    /// Decodes stored bytes. Returns `None` when the bytes are not a valid value.
    fn decode(&self, bytes: &[u8]) -> Option<V>;
}

/// JSON codec for any serde type.
pub struct JsonCodec<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> JsonCodec<V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for JsonCodec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for JsonCodec<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for JsonCodec<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<V> ValueCodec<V> for JsonCodec<V>
where
    V: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &V) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Option<V> {
        serde_json::from_slice(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec::<String>::new();
        let bytes = codec.encode(&"v1".to_string()).unwrap();
        assert_eq!(bytes, b"\"v1\"".to_vec());
        assert_eq!(codec.decode(&bytes), Some("v1".to_string()));
    }

    #[test]
    fn test_json_codec_decode_miss() {
        let codec = JsonCodec::<u64>::new();
        assert_eq!(codec.decode(b"not json"), None);
        assert_eq!(codec.decode(b"\"a string\""), None);
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    impl<'de> serde::Deserialize<'de> for Unencodable {
        fn deserialize<D: serde::Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
            Ok(Unencodable)
        }
    }

    #[test]
    fn test_json_codec_encode_error() {
        let codec = JsonCodec::<Unencodable>::new();
        let err = codec.encode(&Unencodable).unwrap_err();
        assert!(err.to_string().contains("refusing to serialize"));
    }
}
