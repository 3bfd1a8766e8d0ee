//! # grigio-commons
//!
//! Key and value types shared by the grigio key-value tables.
//!
//! - [`ByteKey`]: raw byte keys with content-based equality and hashing
//! - [`ValueCodec`]: the seam that turns domain values into stored bytes
//! - [`MessageContext`] and [`StreamCheckpoint`]: values the key coordinator stores

pub mod byte_key;
pub mod checkpoint;
pub mod codec;
pub mod message_context;

pub use byte_key::ByteKey;
pub use checkpoint::StreamCheckpoint;
pub use codec::{CodecError, JsonCodec, ValueCodec};
pub use message_context::{MessageContext, MessageContextCodec};
