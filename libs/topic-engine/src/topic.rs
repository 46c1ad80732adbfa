use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::error::BrokerError;

/// Upper bound of a range read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// Up to the topic length at the moment the read is served.
    Latest,
    /// Exclusive end offset.
    At(u64),
}

impl RangeEnd {
    /// Wire sentinel for [`RangeEnd::Latest`].
    pub const LATEST_SENTINEL: i64 = -1;

    /// Decode the wire form: `-1` is `Latest`, any non-negative value is an
    /// offset, anything else is invalid.
    pub fn from_wire(raw: i64) -> Option<Self> {
        match raw {
            Self::LATEST_SENTINEL => Some(RangeEnd::Latest),
            n if n >= 0 => Some(RangeEnd::At(n as u64)),
            _ => None,
        }
    }

    pub fn to_wire(self) -> i64 {
        match self {
            RangeEnd::Latest => Self::LATEST_SENTINEL,
            RangeEnd::At(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

/// Copied slice of a topic plus the effective end offset it was cut at.
///
/// `end` is what a sequential consumer passes as `start` next time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRange {
    pub messages: Vec<Value>,
    pub end: u64,
}

/// A named, append-only sequence of opaque messages.
///
/// Never `Clone`: every holder shares one instance through an `Arc` handed out
/// by [`TopicDirectory`](crate::TopicDirectory), so all appends and reads go
/// through the same lock.
pub struct Topic {
    name: String,
    messages: Mutex<Vec<Value>>,
}

impl std::fmt::Debug for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic").field("name", &self.name).finish()
    }
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> u64 {
        self.lock().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Append one message and return the new length.
    pub fn append(&self, value: Value) -> u64 {
        let mut messages = self.lock();
        messages.push(value);
        messages.len() as u64
    }

    /// Copy `messages[start..end]` out under the topic lock.
    ///
    /// Checks run in a fixed order: start past the last message, start not
    /// before the effective end, end past the length.
    pub fn read_range(&self, start: u64, end: RangeEnd) -> Result<ReadRange, BrokerError> {
        let messages = self.lock();
        let len = messages.len() as u64;

        let end = match end {
            RangeEnd::Latest => len,
            RangeEnd::At(n) => n,
        };

        if start >= len {
            return Err(BrokerError::StartBeyondEnd { start, len });
        }
        if start >= end {
            return Err(BrokerError::StartNotBeforeEnd { start, end });
        }
        if end > len {
            return Err(BrokerError::EndBeyondLength { end, len });
        }

        // Both bounds are <= len, so they fit in usize.
        let copied = messages[start as usize..end as usize].to_vec();
        Ok(ReadRange {
            messages: copied,
            end,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Value>> {
        match self.messages.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!(topic = %self.name, "topic lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}
