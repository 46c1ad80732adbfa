//! In-memory topic store for the procon broker.
//!
//! Producers append opaque JSON values to named topics; consumers read copied
//! ranges of a topic by offset. Topics are created on first append and live
//! for the life of the process.

pub mod directory;
pub mod error;
pub mod topic;

use std::sync::Arc;

use serde_json::Value;

pub use directory::TopicDirectory;
pub use error::BrokerError;
pub use topic::{RangeEnd, ReadRange, Topic};

// ═══════════════════════════════════════════════════════════════
//  Broker
// ═══════════════════════════════════════════════════════════════

/// Façade over the topic directory: the two verbs the request layer needs.
///
/// Shared between request handlers as `Arc<Broker>`.
#[derive(Debug, Default)]
pub struct Broker {
    directory: TopicDirectory,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to `topic`, creating the topic if needed.
    ///
    /// Returns the new topic length, i.e. the offset right after this message.
    pub fn produce(&self, topic: &str, value: Value) -> u64 {
        let topic: Arc<Topic> = self.directory.ensure_topic(topic);
        topic.append(value)
    }

    /// Read `[start, end)` from an existing topic.
    pub fn consume(&self, topic: &str, start: u64, end: RangeEnd) -> Result<ReadRange, BrokerError> {
        let topic = self
            .directory
            .lookup_topic(topic)
            .ok_or_else(|| BrokerError::UnknownTopic(topic.to_string()))?;
        topic.read_range(start, end)
    }

    pub fn topics(&self) -> Vec<String> {
        self.directory.topic_names()
    }

    pub fn directory(&self) -> &TopicDirectory {
        &self.directory
    }
}
