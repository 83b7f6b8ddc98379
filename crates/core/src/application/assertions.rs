// Queue Assertions - inspect store state and explain mismatches
//
// Every assertion returns `Err(QueueError::Assertion(..))` on mismatch with a
// message naming the job, the expected args (when given) and the queue.
// Scoped forms snapshot a count, run the action, then compare.

use crate::application::QueueStore;
use crate::domain::{inspect_args, inspect_records, Arg, JobMatcher};
use crate::error::{AssertionFailure, Result};
use crate::port::JobClass;

/// Succeeds if the job's queue holds at least one matching record.
///
/// `expected = None` matches any arguments; otherwise the normalized
/// arguments must be equal, so symbols and strings compare alike.
pub fn assert_queued(store: &QueueStore, job: &dyn JobClass, expected: Option<&[Arg]>) -> Result<()> {
    let queue = store.queue_for(job)?;
    assert_queued_in(store, &queue, job, expected)
}

/// Like [`assert_queued`] but against an explicit queue.
pub fn assert_queued_in(
    store: &QueueStore,
    queue: &str,
    job: &dyn JobClass,
    expected: Option<&[Arg]>,
) -> Result<()> {
    let matcher = JobMatcher::new(job, expected);
    if store.records(queue).any(|record| matcher.matches(record)) {
        return Ok(());
    }
    Err(should_have_been_queued(store, queue, job, expected).into())
}

/// Succeeds if no record in the job's queue matches.
pub fn assert_not_queued(
    store: &QueueStore,
    job: &dyn JobClass,
    expected: Option<&[Arg]>,
) -> Result<()> {
    let queue = store.queue_for(job)?;
    if count_in(store, &queue, job, expected) > 0 {
        return Err(should_not_have_been_queued(&queue, job, expected).into());
    }
    Ok(())
}

/// Fails only if `action` added a matching record; matches that existed
/// before the action are ignored.
pub fn assert_not_queued_during<F>(
    store: &mut QueueStore,
    job: &dyn JobClass,
    expected: Option<&[Arg]>,
    action: F,
) -> Result<()>
where
    F: FnOnce(&mut QueueStore) -> Result<()>,
{
    let queue = store.queue_for(job)?;
    let before = count_in(store, &queue, job, expected);
    action(store)?;
    let after = count_in(store, &queue, job, expected);

    if after > before {
        return Err(should_not_have_been_queued(&queue, job, expected).into());
    }
    Ok(())
}

/// Succeeds only if `action` added at least one matching record.
pub fn assert_queues<F>(
    store: &mut QueueStore,
    job: &dyn JobClass,
    expected: Option<&[Arg]>,
    action: F,
) -> Result<()>
where
    F: FnOnce(&mut QueueStore) -> Result<()>,
{
    let queue = store.queue_for(job)?;
    let before = count_in(store, &queue, job, expected);
    action(store)?;
    let after = count_in(store, &queue, job, expected);

    if after > before {
        return Ok(());
    }
    Err(should_have_been_queued(store, &queue, job, expected).into())
}

/// Succeeds only if the total number of queued records is unchanged by `action`.
pub fn assert_nothing_queued<F>(store: &mut QueueStore, action: F) -> Result<()>
where
    F: FnOnce(&mut QueueStore) -> Result<()>,
{
    let before = store.total_size();
    action(store)?;
    let after = store.total_size();

    if before != after {
        return Err(AssertionFailure::new(format!(
            "No jobs should have been queued.\n<{before}> expected but was\n<{after}>."
        ))
        .into());
    }
    Ok(())
}

/// Number of matching records in the job's queue.
pub fn count_queued(store: &QueueStore, job: &dyn JobClass, expected: Option<&[Arg]>) -> Result<usize> {
    let queue = store.queue_for(job)?;
    Ok(count_in(store, &queue, job, expected))
}

fn count_in(store: &QueueStore, queue: &str, job: &dyn JobClass, expected: Option<&[Arg]>) -> usize {
    let matcher = JobMatcher::new(job, expected);
    store.records(queue).filter(|record| matcher.matches(record)).count()
}

/// "<Job> " or "<Job> with <args> "
fn subject(job: &dyn JobClass, expected: Option<&[Arg]>) -> String {
    match expected {
        Some(args) => format!("{} with {} ", job.name(), inspect_args(args)),
        None => format!("{} ", job.name()),
    }
}

fn should_have_been_queued(
    store: &QueueStore,
    queue: &str,
    job: &dyn JobClass,
    expected: Option<&[Arg]>,
) -> AssertionFailure {
    AssertionFailure::new(format!(
        "{}should have been queued in {}: {}.",
        subject(job, expected),
        queue,
        inspect_records(store.records(queue))
    ))
}

fn should_not_have_been_queued(
    queue: &str,
    job: &dyn JobClass,
    expected: Option<&[Arg]>,
) -> AssertionFailure {
    AssertionFailure::new(format!(
        "{}should not have been queued in {}.",
        subject(job, expected),
        queue
    ))
}
