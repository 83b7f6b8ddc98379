//! Fixture job classes and test setup shared by the scenario suites.

#![allow(dead_code)]

use inline_queue_core::{Arg, Around, JobClass, JobResult, QueueName, QueueStore};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("inline_queue_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Fresh store with tracing installed and hooks off.
pub fn store() -> QueueStore {
    init_tracing();
    QueueStore::new()
}

/// Error raised by fixture jobs told to fail.
#[derive(Debug)]
pub struct JobFailure(pub &'static str);

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job failure: {}", self.0)
    }
}

impl std::error::Error for JobFailure {}

#[derive(Clone, Default)]
pub struct LowPriorityJob {
    ran: Arc<AtomicBool>,
}

impl LowPriorityJob {
    pub fn has_run(&self) -> bool {
        self.ran.load(Ordering::SeqCst)
    }
}

impl JobClass for LowPriorityJob {
    fn queue(&self) -> Option<QueueName> {
        Some("low".to_string())
    }

    fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        self.ran.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MediumPriorityJob;

impl JobClass for MediumPriorityJob {
    fn queue(&self) -> Option<QueueName> {
        Some("medium".to_string())
    }

    fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct HighPriorityJob;

impl JobClass for HighPriorityJob {
    fn queue(&self) -> Option<QueueName> {
        Some("high".to_string())
    }

    fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct JobWithArguments;

impl JobClass for JobWithArguments {
    fn queue(&self) -> Option<QueueName> {
        Some("medium".to_string())
    }

    fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        Ok(())
    }
}

/// Enqueues a `LowPriorityJob` when performed.
#[derive(Clone, Default)]
pub struct JobThatCreatesANewJob {
    pub follow_up: LowPriorityJob,
}

impl JobClass for JobThatCreatesANewJob {
    fn queue(&self) -> Option<QueueName> {
        Some("normal".to_string())
    }

    fn perform(&self, store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        store.enqueue(self.follow_up.clone(), vec![])?;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct JobThatDoesNotSpecifyAQueue;

impl JobClass for JobThatDoesNotSpecifyAQueue {
    fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MyJob;

impl JobClass for MyJob {
    fn queue(&self) -> Option<QueueName> {
        Some("critical".to_string())
    }

    fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum HookMode {
    #[default]
    Normal,
    Fail,
    DontPerform,
}

/// Sets a marker from every hook it runs.
///
/// The mode is shared between clones, so it can be switched after the job
/// has been enqueued.
#[derive(Clone, Default)]
pub struct JobWithHooks {
    markers: Arc<Mutex<BTreeSet<&'static str>>>,
    mode: Arc<Mutex<HookMode>>,
}

impl JobWithHooks {
    pub fn marked(&self, marker: &str) -> bool {
        self.markers.lock().unwrap().contains(marker)
    }

    pub fn clear_markers(&self) {
        self.markers.lock().unwrap().clear();
    }

    pub fn make_it_fail(&self) {
        *self.mode.lock().unwrap() = HookMode::Fail;
    }

    pub fn make_it_dont_perform(&self) {
        *self.mode.lock().unwrap() = HookMode::DontPerform;
    }

    fn mark(&self, marker: &'static str) {
        self.markers.lock().unwrap().insert(marker);
    }

    fn mode(&self) -> HookMode {
        *self.mode.lock().unwrap()
    }
}

impl JobClass for JobWithHooks {
    fn queue(&self) -> Option<QueueName> {
        Some("with_hooks".to_string())
    }

    fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
        if self.mode() == HookMode::Fail {
            return Err(JobFailure("perform").into());
        }
        Ok(())
    }

    fn before(&self, _args: &[Arg]) -> JobResult {
        self.mark("before");
        Ok(())
    }

    fn around(&self, _args: &[Arg], perform: &mut dyn FnMut() -> JobResult) -> JobResult<Around> {
        self.mark("around");
        if self.mode() == HookMode::DontPerform {
            return Ok(Around::DontPerform);
        }
        perform()?;
        Ok(Around::Continue)
    }

    fn after(&self, _args: &[Arg]) -> JobResult {
        self.mark("after");
        Ok(())
    }

    fn on_failure(&self, _error: &anyhow::Error, _args: &[Arg]) -> JobResult {
        self.mark("failed");
        Ok(())
    }

    fn after_enqueue(&self, _args: &[Arg]) -> JobResult {
        self.mark("after_enqueue");
        Ok(())
    }
}

/// `(1, :test, {:symbol => :symbol})`
pub fn symbolic_args() -> Vec<Arg> {
    vec![
        Arg::from(1),
        Arg::sym("test"),
        Arg::map([(Arg::sym("symbol"), Arg::sym("symbol"))]),
    ]
}
