//! Byte-sequence keys with value semantics.
//!
//! Keys reach a table from many different buffers (decoded records, network
//! frames, previous read results). Two keys with the same content must land in
//! the same map slot no matter which buffer they were built from, so equality,
//! ordering and hashing are all defined over the bytes themselves.

use std::borrow::Borrow;
use std::fmt;

/// An immutable byte key compared and hashed by content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ByteKey(Vec<u8>);

impl ByteKey {
    /// Creates a key that owns the given bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the key, returning the owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for ByteKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for ByteKey {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for ByteKey {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for ByteKey {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<ByteKey> for Vec<u8> {
    fn from(key: ByteKey) -> Self {
        key.0
    }
}

/// Hex rendering, used in log lines.
impl fmt::Display for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteKey({})", hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashMap;
    use std::hash::{Hash, Hasher};

    fn hash_of(key: &ByteKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_distinct_buffers_with_same_content_are_equal() {
        let first = vec![1u8, 2, 3];
        let second: Vec<u8> = [1u8, 2, 3].iter().copied().collect();
        assert_ne!(first.as_ptr(), second.as_ptr());

        let a = ByteKey::from(first);
        let b = ByteKey::from(second);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_map_lookup_across_buffers() {
        let mut map = HashMap::new();
        map.insert(ByteKey::from("user:42"), 7);

        let probe = ByteKey::new(String::from("user:42").into_bytes());
        assert_eq!(map.get(&probe), Some(&7));
        assert_eq!(map.get(b"user:42".as_slice()), Some(&7));
    }

    #[test]
    fn test_different_content_not_equal() {
        assert_ne!(ByteKey::from("a"), ByteKey::from("b"));
        assert!(ByteKey::from("a") < ByteKey::from("b"));
    }

    #[test]
    fn test_display_is_hex() {
        let key = ByteKey::new(vec![0xde, 0xad, 0x01]);
        assert_eq!(key.to_string(), "dead01");
        assert_eq!(format!("{:?}", key), "ByteKey(dead01)");
    }

    #[test]
    fn test_into_bytes_round_trip() {
        let key = ByteKey::from("k1");
        assert_eq!(key.len(), 2);
        assert!(!key.is_empty());
        assert_eq!(key.into_bytes(), b"k1".to_vec());
    }
}
