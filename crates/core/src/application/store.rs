// Queue Store - owns all queue state

use crate::config::StoreConfig;
use crate::domain::{inspect_args, normalize_all, Arg, JobMatcher, JobRecord, Queue, QueueName};
use crate::error::{QueueError, Result};
use crate::port::JobClass;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// In-memory store of named FIFO queues.
///
/// One instance per test scenario; there is no shared global. Passes over
/// all queues visit them in name order. A queue that becomes empty is
/// dropped, so an absent queue and an empty queue look the same (size 0).
///
/// Single-threaded by construction: every mutating call takes `&mut self`.
#[derive(Debug, Default)]
pub struct QueueStore {
    queues: BTreeMap<QueueName, Queue>,
    hooks_enabled: bool,
    config: StoreConfig,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            queues: BTreeMap::new(),
            hooks_enabled: config.hooks_enabled,
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Resolve the queue a job class enqueues into.
    pub fn queue_for(&self, job: &dyn JobClass) -> Result<QueueName> {
        match job.queue() {
            Some(queue) if !queue.is_empty() => Ok(queue),
            _ => Err(QueueError::no_queue(job.name())),
        }
    }

    /// Enqueue a job into the queue its class selects.
    ///
    /// Arguments are normalized before they are stored. With hooks enabled,
    /// `after_enqueue` runs after the append with the original arguments; an
    /// error from it is returned but the record stays queued.
    ///
    /// # Errors
    /// - `QueueError::NoQueue` if the class has no queue (nothing is stored)
    /// - `QueueError::Job` if `after_enqueue` fails
    pub fn enqueue<J>(&mut self, job: J, args: Vec<Arg>) -> Result<()>
    where
        J: JobClass + 'static,
    {
        let queue = self.queue_for(&job)?;
        self.enqueue_to(&queue, job, args)
    }

    /// Enqueue into an explicit queue, bypassing the class's selector.
    pub fn enqueue_to<J>(&mut self, queue: &str, job: J, args: Vec<Arg>) -> Result<()>
    where
        J: JobClass + 'static,
    {
        let class: Arc<dyn JobClass> = Arc::new(job);
        let record = JobRecord::new(Arc::clone(&class), normalize_all(&args));

        debug!(
            queue = %queue,
            job = %record.class_name(),
            args = %inspect_args(record.args()),
            "Job enqueued"
        );
        self.push(queue, record);

        if self.hooks_enabled {
            class.after_enqueue(&args).map_err(QueueError::Job)?;
        }
        Ok(())
    }

    /// Insert a record directly: no selector, no normalization, no hooks.
    ///
    /// Seeds state the way an outside producer writing to the queue would.
    pub fn create<J>(&mut self, queue: &str, job: J, args: Vec<Arg>)
    where
        J: JobClass + 'static,
    {
        let record = JobRecord::new(Arc::new(job), args);
        debug!(queue = %queue, job = %record.class_name(), "Job record created");
        self.push(queue, record);
    }

    /// Remove the head record of a queue.
    pub fn pop(&mut self, queue: &str) -> Option<JobRecord> {
        let entry = self.queues.get_mut(queue)?;
        let record = entry.pop();
        if entry.is_empty() {
            self.queues.remove(queue);
        }
        record
    }

    /// Remove every record of `job` (optionally only those with matching
    /// arguments) from the job's queue. Returns the number removed.
    pub fn dequeue(&mut self, job: &dyn JobClass, expected: Option<&[Arg]>) -> Result<usize> {
        let queue = self.queue_for(job)?;
        let matcher = JobMatcher::new(job, expected);

        let Some(entry) = self.queues.get_mut(&queue) else {
            return Ok(0);
        };
        let removed = entry.retain(|record| !matcher.matches(record));
        if entry.is_empty() {
            self.queues.remove(&queue);
        }

        debug!(queue = %queue, job = %job.name(), removed, "Jobs dequeued");
        Ok(removed)
    }

    /// Number of records in a queue (0 if absent).
    pub fn size(&self, queue: &str) -> usize {
        self.queues.get(queue).map_or(0, Queue::len)
    }

    /// Number of records across all queues.
    pub fn total_size(&self) -> usize {
        self.queues.values().map(Queue::len).sum()
    }

    /// Read-only view of a queue, head first.
    pub fn records<'a>(&'a self, queue: &str) -> impl Iterator<Item = &'a JobRecord> + 'a {
        self.queues.get(queue).into_iter().flat_map(Queue::iter)
    }

    /// Snapshot of a queue's contents, head first.
    pub fn contents(&self, queue: &str) -> Vec<JobRecord> {
        self.records(queue).cloned().collect()
    }

    /// Names of the queues currently holding records, in pass order.
    pub fn queue_names(&self) -> Vec<QueueName> {
        self.queues.keys().cloned().collect()
    }

    /// Clear all queues and restore the hooks toggle to its configured default.
    pub fn reset(&mut self) {
        debug!(queues = self.queues.len(), "Queue store reset");
        self.queues.clear();
        self.hooks_enabled = self.config.hooks_enabled;
    }

    pub fn enable_hooks(&mut self) {
        self.hooks_enabled = true;
    }

    pub fn disable_hooks(&mut self) {
        self.hooks_enabled = false;
    }

    pub fn hooks_enabled(&self) -> bool {
        self.hooks_enabled
    }

    /// JSON snapshot `{queue: [{"class": ..., "args": [...]}, ...]}`.
    pub fn export(&self) -> Result<serde_json::Value> {
        let mut out = serde_json::Map::new();
        for queue in self.queues.values() {
            let payloads = queue
                .iter()
                .map(JobRecord::payload)
                .collect::<serde_json::Result<Vec<_>>>()?;
            out.insert(queue.name().to_string(), serde_json::Value::Array(payloads));
        }
        Ok(serde_json::Value::Object(out))
    }

    fn push(&mut self, queue: &str, record: JobRecord) {
        self.queues
            .entry(queue.to_string())
            .or_insert_with(|| Queue::new(queue))
            .push(record);
    }
}
