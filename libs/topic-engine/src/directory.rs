use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::topic::Topic;

/// Name → topic map. Owns topic lifecycle: lazy creation, never removal.
///
/// The directory lock only covers the map itself. It is released before any
/// topic lock is taken, so traffic on one topic never waits on another.
#[derive(Debug, Default)]
pub struct TopicDirectory {
    topics: RwLock<HashMap<String, Arc<Topic>>>,
}

impl TopicDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the topic for `name`, creating it if absent.
    ///
    /// Concurrent callers racing on a new name all receive the same instance.
    pub fn ensure_topic(&self, name: &str) -> Arc<Topic> {
        if let Some(topic) = self.lookup_topic(name) {
            return topic;
        }

        let mut guard = self.write();
        guard
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(topic = %name, "created topic");
                Arc::new(Topic::new(name))
            })
            .clone()
    }

    /// Return the topic for `name` without creating it.
    pub fn lookup_topic(&self, name: &str) -> Option<Arc<Topic>> {
        self.read().get(name).cloned()
    }

    /// Sorted topic names.
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Topic>>> {
        match self.topics.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("topic directory read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Topic>>> {
        match self.topics.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("topic directory write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}
