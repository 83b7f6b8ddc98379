// Queue Domain Model

use crate::domain::job::JobRecord;
use std::collections::VecDeque;

/// Queue identifier
pub type QueueName = String;

/// A named FIFO of pending job records (append at tail, pop from head).
#[derive(Debug, Clone)]
pub struct Queue {
    name: QueueName,
    records: VecDeque<JobRecord>,
}

impl Queue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, record: JobRecord) {
        self.records.push_back(record);
    }

    pub fn pop(&mut self) -> Option<JobRecord> {
        self.records.pop_front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobRecord> + '_ {
        self.records.iter()
    }

    /// Keep only the records matching `keep`; returns how many were removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&JobRecord) -> bool,
    {
        let before = self.records.len();
        self.records.retain(keep);
        before - self.records.len()
    }
}
