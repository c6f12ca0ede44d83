//! Player-facing activity log: a short, newest-first list of lines.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::{RealmTick, DEFAULT_LOG_CAPACITY, MAX_LOG_CAPACITY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLine {
    pub tick: RealmTick,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    lines: VecDeque<ActivityLine>,
    capacity: usize,
    total_added: u64,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_LOG_CAPACITY);
        Self {
            lines: VecDeque::new(),
            capacity,
            total_added: 0,
        }
    }

    pub fn push(&mut self, tick: RealmTick, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "realm_world::activity", tick, "{message}");
        self.lines.push_front(ActivityLine { tick, message });
        self.lines.truncate(self.capacity);
        self.total_added = self.total_added.saturating_add(1);
    }

    /// Newest first.
    pub fn lines(&self) -> impl Iterator<Item = &ActivityLine> {
        self.lines.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.message.as_str()).collect()
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(|line| line.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_added(&self) -> u64 {
        self.total_added
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
