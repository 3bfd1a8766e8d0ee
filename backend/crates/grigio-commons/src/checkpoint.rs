//! Stream checkpoints.
//!
//! A checkpoint maps each shard of a stream to the sequence number consumption
//! should resume from. It is stored as a JSON object so that it can live in a
//! key-value table next to other coordinator state.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Shard to start-sequence map, ordered by shard id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamCheckpoint {
    shard_to_start_sequence: BTreeMap<String, String>,
}

impl StreamCheckpoint {
    pub fn new(shard_to_start_sequence: BTreeMap<String, String>) -> Self {
        Self {
            shard_to_start_sequence,
        }
    }

    pub fn shard_to_start_sequence(&self) -> &BTreeMap<String, String> {
        &self.shard_to_start_sequence
    }

    /// Renders the checkpoint as a JSON object string.
    pub fn serialize(&self) -> String {
        // A string-to-string map always serializes.
        serde_json::to_string(&self.shard_to_start_sequence).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn deserialize(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob).map(Self::new)
    }

    /// Orders two checkpoints by the start sequence of their first shard.
    ///
    /// An empty checkpoint sorts before any non-empty one.
    pub fn compare_position(&self, other: &Self) -> Ordering {
        self.first_sequence().cmp(&other.first_sequence())
    }

    fn first_sequence(&self) -> Option<&String> {
        self.shard_to_start_sequence.values().next()
    }
}
