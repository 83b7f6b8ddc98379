// Hook Dispatcher - runs one job through its lifecycle hooks

use crate::application::QueueStore;
use crate::domain::{Arg, JobRecord};
use crate::error::{QueueError, Result};
use crate::port::{Around, JobClass, JobResult};
use tracing::{debug, warn};

/// How a single execution ended (failures are returned as errors instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `perform` ran to completion.
    Performed,
    /// The `around` hook skipped `perform`.
    Skipped,
}

/// Execute one popped record.
///
/// With hooks disabled this is just `perform`. With hooks enabled:
///
/// 1. `before`
/// 2. `around`, wrapping `perform`
/// 3. `after`, only if `perform` completed and `around` did not return `DontPerform`
///
/// Any error in steps 1-3 is handed to `on_failure` and then returned
/// unchanged as `QueueError::Job`. `DontPerform` is not an error and never
/// reaches `on_failure`.
pub fn execute(store: &mut QueueStore, record: JobRecord) -> Result<Outcome> {
    let (class, args) = record.into_parts();

    if !store.hooks_enabled() {
        class.perform(store, &args).map_err(QueueError::Job)?;
        return Ok(Outcome::Performed);
    }

    match run_lifecycle(class.as_ref(), store, &args) {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            debug!(job = %class.name(), error = %err, "Running on_failure hook");
            if let Err(hook_err) = class.on_failure(&err, &args) {
                warn!(
                    job = %class.name(),
                    error = %hook_err,
                    "on_failure hook failed; re-raising original error"
                );
            }
            Err(QueueError::Job(err))
        }
    }
}

fn run_lifecycle(job: &dyn JobClass, store: &mut QueueStore, args: &[Arg]) -> JobResult<Outcome> {
    job.before(args)?;

    let mut performed = false;
    let around = job.around(args, &mut || -> JobResult {
        job.perform(store, args)?;
        performed = true;
        Ok(())
    })?;

    if around == Around::DontPerform {
        debug!(job = %job.name(), "around hook signalled DontPerform");
        return Ok(Outcome::Skipped);
    }
    if !performed {
        debug!(job = %job.name(), "around hook did not call perform");
        return Ok(Outcome::Skipped);
    }

    job.after(args)?;
    Ok(Outcome::Performed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueueName;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Default, PartialEq)]
    enum Mode {
        #[default]
        Normal,
        FailInBefore,
        FailInPerform,
        FailInAfter,
        DontPerform,
        DontPerformAfterRunning,
        SwallowPerform,
    }

    #[derive(Clone, Default)]
    struct Traced {
        mode: Mode,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Traced {
        fn with_mode(mode: Mode) -> Self {
            Self {
                mode,
                ..Self::default()
            }
        }

        fn mark(&self, step: &str) {
            self.calls.lock().unwrap().push(step.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl JobClass for Traced {
        fn queue(&self) -> Option<QueueName> {
            Some("traced".to_string())
        }

        fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
            self.mark("perform");
            if self.mode == Mode::FailInPerform {
                anyhow::bail!("perform failed");
            }
            Ok(())
        }

        fn before(&self, _args: &[Arg]) -> JobResult {
            self.mark("before");
            if self.mode == Mode::FailInBefore {
                anyhow::bail!("before failed");
            }
            Ok(())
        }

        fn around(&self, _args: &[Arg], perform: &mut dyn FnMut() -> JobResult) -> JobResult<Around> {
            self.mark("around");
            match self.mode {
                Mode::DontPerform => Ok(Around::DontPerform),
                Mode::DontPerformAfterRunning => {
                    perform()?;
                    Ok(Around::DontPerform)
                }
                Mode::SwallowPerform => Ok(Around::Continue),
                _ => {
                    perform()?;
                    Ok(Around::Continue)
                }
            }
        }

        fn after(&self, _args: &[Arg]) -> JobResult {
            self.mark("after");
            if self.mode == Mode::FailInAfter {
                anyhow::bail!("after failed");
            }
            Ok(())
        }

        fn on_failure(&self, error: &anyhow::Error, _args: &[Arg]) -> JobResult {
            self.mark(&format!("on_failure: {error}"));
            Ok(())
        }
    }

    fn run(job: &Traced, hooks: bool) -> Result<Outcome> {
        let mut store = QueueStore::new();
        if hooks {
            store.enable_hooks();
        }
        store.enqueue(job.clone(), vec![]).unwrap();
        let record = store.pop("traced").unwrap();
        execute(&mut store, record)
    }

    #[test]
    fn test_hooks_disabled_only_performs() {
        let job = Traced::default();
        assert_eq!(run(&job, false).unwrap(), Outcome::Performed);
        assert_eq!(job.calls(), vec!["perform"]);
    }

    #[test]
    fn test_hooks_disabled_propagates_error_without_on_failure() {
        let job = Traced::with_mode(Mode::FailInPerform);
        let err = run(&job, false).unwrap_err();
        assert_eq!(err.to_string(), "perform failed");
        assert_eq!(job.calls(), vec!["perform"]);
    }

    #[test]
    fn test_full_lifecycle_order() {
        let job = Traced::default();
        assert_eq!(run(&job, true).unwrap(), Outcome::Performed);
        assert_eq!(job.calls(), vec!["before", "around", "perform", "after"]);
    }

    #[test]
    fn test_failure_in_perform() {
        let job = Traced::with_mode(Mode::FailInPerform);
        let err = run(&job, true).unwrap_err();
        assert!(err.as_job_error().is_some());
        assert_eq!(
            job.calls(),
            vec!["before", "around", "perform", "on_failure: perform failed"]
        );
    }

    #[test]
    fn test_failure_in_before_still_reaches_on_failure() {
        let job = Traced::with_mode(Mode::FailInBefore);
        let err = run(&job, true).unwrap_err();
        assert_eq!(err.to_string(), "before failed");
        assert_eq!(job.calls(), vec!["before", "on_failure: before failed"]);
    }

    #[test]
    fn test_failure_in_after() {
        let job = Traced::with_mode(Mode::FailInAfter);
        run(&job, true).unwrap_err();
        assert_eq!(
            job.calls(),
            vec!["before", "around", "perform", "after", "on_failure: after failed"]
        );
    }

    #[test]
    fn test_dont_perform_is_not_a_failure() {
        let job = Traced::with_mode(Mode::DontPerform);
        assert_eq!(run(&job, true).unwrap(), Outcome::Skipped);
        assert_eq!(job.calls(), vec!["before", "around"]);
    }

    #[test]
    fn test_dont_perform_after_running_skips_after() {
        let job = Traced::with_mode(Mode::DontPerformAfterRunning);
        assert_eq!(run(&job, true).unwrap(), Outcome::Skipped);
        assert_eq!(job.calls(), vec!["before", "around", "perform"]);
    }

    #[test]
    fn test_around_without_perform_skips_after() {
        let job = Traced::with_mode(Mode::SwallowPerform);
        assert_eq!(run(&job, true).unwrap(), Outcome::Skipped);
        assert_eq!(job.calls(), vec!["before", "around"]);
    }

    #[test]
    fn test_failing_on_failure_keeps_original_error() {
        struct Brittle;

        impl JobClass for Brittle {
            fn queue(&self) -> Option<QueueName> {
                Some("brittle".to_string())
            }

            fn perform(&self, _store: &mut QueueStore, _args: &[Arg]) -> JobResult {
                anyhow::bail!("original")
            }

            fn on_failure(&self, _error: &anyhow::Error, _args: &[Arg]) -> JobResult {
                anyhow::bail!("hook broke")
            }
        }

        let mut store = QueueStore::new();
        store.enable_hooks();
        store.enqueue(Brittle, vec![]).unwrap();
        let record = store.pop("brittle").unwrap();

        let err = execute(&mut store, record).unwrap_err();
        assert_eq!(err.to_string(), "original");
    }
}
