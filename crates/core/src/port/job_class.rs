// Job Class Port (Interface)
// The store only queries a job class; it never owns its business logic.

use crate::application::QueueStore;
use crate::domain::{Arg, QueueName};
use std::sync::Arc;

/// Result of a job body or hook. Job failures are arbitrary application errors.
pub type JobResult<T = ()> = std::result::Result<T, anyhow::Error>;

/// What an `around` hook decided to do with the wrapped `perform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Around {
    /// Carry on; `after` runs if `perform` completed.
    Continue,
    /// Deliberate skip. Not a failure: `after` and `on_failure` do not run
    /// and nothing propagates to the caller.
    DontPerform,
}

/// Job class contract.
///
/// Required: `perform`. A job without a `queue` cannot be enqueued
/// (`QueueError::NoQueue`). Every hook has a no-op default, so an absent hook
/// is simply the default body; hooks only fire while the store has hooks
/// enabled.
///
/// # Example
/// ```text
/// struct SendReceipt;
///
/// impl JobClass for SendReceipt {
///     fn queue(&self) -> Option<QueueName> {
///         Some("mailers".into())
///     }
///
///     fn perform(&self, _store: &mut QueueStore, args: &[Arg]) -> JobResult {
///         deliver(args)
///     }
/// }
/// ```
pub trait JobClass: Send + Sync {
    /// Class name used for matching and messages (unqualified type name by default).
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Identity used to match records against a job class. Fully qualified,
    /// so same-named types in different modules stay distinct.
    fn type_key(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue selector.
    fn queue(&self) -> Option<QueueName> {
        None
    }

    /// Job body. `store` lets a job enqueue follow-up jobs.
    fn perform(&self, store: &mut QueueStore, args: &[Arg]) -> JobResult;

    fn before(&self, _args: &[Arg]) -> JobResult {
        Ok(())
    }

    /// Wraps `perform`. Call `perform` to run the job body, or return
    /// `Around::DontPerform` without calling it to skip the job.
    fn around(
        &self,
        _args: &[Arg],
        perform: &mut dyn FnMut() -> JobResult,
    ) -> JobResult<Around> {
        perform()?;
        Ok(Around::Continue)
    }

    fn after(&self, _args: &[Arg]) -> JobResult {
        Ok(())
    }

    /// Observes a failure from `before`, `around`/`perform` or `after`.
    /// The original error is re-raised afterwards regardless.
    fn on_failure(&self, _error: &anyhow::Error, _args: &[Arg]) -> JobResult {
        Ok(())
    }

    /// Runs right after the record is appended, with the unnormalized args.
    fn after_enqueue(&self, _args: &[Arg]) -> JobResult {
        Ok(())
    }
}

impl<J> JobClass for Arc<J>
where
    J: JobClass + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn type_key(&self) -> &'static str {
        (**self).type_key()
    }

    fn queue(&self) -> Option<QueueName> {
        (**self).queue()
    }

    fn perform(&self, store: &mut QueueStore, args: &[Arg]) -> JobResult {
        (**self).perform(store, args)
    }

    fn before(&self, args: &[Arg]) -> JobResult {
        (**self).before(args)
    }

    fn around(
        &self,
        args: &[Arg],
        perform: &mut dyn FnMut() -> JobResult,
    ) -> JobResult<Around> {
        (**self).around(args, perform)
    }

    fn after(&self, args: &[Arg]) -> JobResult {
        (**self).after(args)
    }

    fn on_failure(&self, error: &anyhow::Error, args: &[Arg]) -> JobResult {
        (**self).on_failure(error, args)
    }

    fn after_enqueue(&self, args: &[Arg]) -> JobResult {
        (**self).after_enqueue(args)
    }
}

/// `my_app::jobs::Reindex<T>` -> `Reindex`
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
