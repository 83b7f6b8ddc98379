// Worker - drains the queue store synchronously
//
// Three run policies:
// - run:       one pass over every queue present when the call starts
// - run_for:   one pass over a single queue
// - full_run:  passes until every queue is empty, including follow-up jobs
//
// A pass snapshots every queue's size when the call starts and executes
// exactly that many records per queue; jobs enqueued during the pass stay
// queued, whichever queue they land in. The first job error aborts the
// whole call and leaves the remaining records queued.

use crate::application::hooks::{self, Outcome};
use crate::application::QueueStore;
use crate::domain::QueueName;
use crate::error::Result;
use tracing::{debug, error, info};

/// Counters for one run call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Single passes made (always 1 for `run` / `run_for`).
    pub passes: usize,
    pub performed: usize,
    /// Jobs whose `around` hook skipped `perform`.
    pub skipped: usize,
}

impl RunReport {
    /// Jobs taken off a queue and executed.
    pub fn executed(&self) -> usize {
        self.performed + self.skipped
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Performed => self.performed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    fn absorb(&mut self, other: RunReport) {
        self.passes += other.passes;
        self.performed += other.performed;
        self.skipped += other.skipped;
    }
}

/// One pass over all queues, each drained of its starting backlog in turn.
pub fn run(store: &mut QueueStore) -> Result<RunReport> {
    let mut report = RunReport {
        passes: 1,
        ..RunReport::default()
    };
    let backlogs: Vec<(QueueName, usize)> = store
        .queue_names()
        .into_iter()
        .map(|queue| {
            let backlog = store.size(&queue);
            (queue, backlog)
        })
        .collect();

    for (queue, backlog) in backlogs {
        drain_backlog(store, &queue, backlog, &mut report)?;
    }

    info!(
        performed = report.performed,
        skipped = report.skipped,
        remaining = store.total_size(),
        "Run pass finished"
    );
    Ok(report)
}

/// One pass over a single queue; other queues are untouched.
pub fn run_for(store: &mut QueueStore, queue: &str) -> Result<RunReport> {
    let mut report = RunReport {
        passes: 1,
        ..RunReport::default()
    };
    let backlog = store.size(queue);
    drain_backlog(store, queue, backlog, &mut report)?;

    info!(
        queue = %queue,
        performed = report.performed,
        skipped = report.skipped,
        remaining = store.size(queue),
        "Queue pass finished"
    );
    Ok(report)
}

/// Repeat passes until the store is empty.
///
/// Terminates only if the graph of "job enqueues another job" is finite;
/// a job that always re-enqueues itself keeps this looping.
pub fn full_run(store: &mut QueueStore) -> Result<RunReport> {
    let mut report = RunReport::default();
    while store.total_size() > 0 {
        report.absorb(run(store)?);
    }

    info!(
        passes = report.passes,
        performed = report.performed,
        skipped = report.skipped,
        "Full run finished"
    );
    Ok(report)
}

fn drain_backlog(
    store: &mut QueueStore,
    queue: &str,
    backlog: usize,
    report: &mut RunReport,
) -> Result<()> {
    debug!(queue = %queue, backlog, "Draining queue");

    for _ in 0..backlog {
        // A job may have emptied the queue itself
        let Some(record) = store.pop(queue) else {
            break;
        };
        let job = record.class_name().to_string();

        match hooks::execute(store, record) {
            Ok(outcome) => {
                debug!(queue = %queue, job = %job, ?outcome, "Job executed");
                report.record(outcome);
            }
            Err(e) => {
                error!(
                    queue = %queue,
                    job = %job,
                    error = %e,
                    remaining = store.size(queue),
                    "Job failed, aborting run"
                );
                return Err(e);
            }
        }
    }
    Ok(())
}

impl QueueStore {
    /// See [`run`].
    pub fn run(&mut self) -> Result<RunReport> {
        run(self)
    }

    /// See [`run_for`].
    pub fn run_for(&mut self, queue: &str) -> Result<RunReport> {
        run_for(self, queue)
    }

    /// See [`full_run`].
    pub fn full_run(&mut self) -> Result<RunReport> {
        full_run(self)
    }
}
