//! Per-key message context kept by the key coordinator.
//!
//! For every primary key the coordinator remembers where the latest record for
//! that key lives: the segment it was indexed into, its event timestamp and the
//! stream offset it was consumed at.

use crate::codec::{CodecError, ValueCodec};
use serde::{Deserialize, Serialize};

/// Location of the latest record for a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    pub segment_name: String,
    pub timestamp: i64,
    pub kafka_offset: i64,
}

impl MessageContext {
    pub fn new(segment_name: impl Into<String>, timestamp: i64, kafka_offset: i64) -> Self {
        Self {
            segment_name: segment_name.into(),
            timestamp,
            kafka_offset,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Parses stored bytes, returning `None` for anything malformed.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

/// Codec storing [`MessageContext`] values through their own byte format.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageContextCodec;

impl ValueCodec<MessageContext> for MessageContextCodec {
    fn encode(&self, value: &MessageContext) -> Result<Vec<u8>, CodecError> {
        value.to_bytes()
    }

    fn decode(&self, bytes: &[u8]) -> Option<MessageContext> {
        MessageContext::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_round_trip() {
        let ctx = MessageContext::new("events__0__12__20240101T0000Z", 1_700_000_000_000, 4242);
        let bytes = ctx.to_bytes().unwrap();
        assert_eq!(MessageContext::from_bytes(&bytes), Some(ctx));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert_eq!(MessageContext::from_bytes(b"\x00\x01\x02"), None);
        assert_eq!(MessageContext::from_bytes(br#"{"segment_name":"s"}"#), None);
    }

    #[test]
    fn test_codec_delegates_to_byte_format() {
        let codec = MessageContextCodec;
        let ctx = MessageContext::new("seg", 1, 2);
        let bytes = codec.encode(&ctx).unwrap();
        assert_eq!(bytes, ctx.to_bytes().unwrap());
        assert_eq!(codec.decode(&bytes), Some(ctx));
    }
}
