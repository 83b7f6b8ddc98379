// Job Record Domain Model

use crate::domain::args::{inspect_args, Arg};
use crate::domain::normalize::normalize_all;
use crate::port::JobClass;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One enqueued unit of work: the job class plus its normalized arguments.
///
/// Immutable once created. Owned by its queue until popped, then handed to
/// the hook dispatcher for the duration of execution.
#[derive(Clone)]
pub struct JobRecord {
    class: Arc<dyn JobClass>,
    args: Vec<Arg>,
}

/// Wire shape of a record, as a broker would store it.
#[derive(Serialize)]
struct Payload<'a> {
    class: &'a str,
    args: &'a [Arg],
}

impl JobRecord {
    /// Build a record from arguments taken as-is (no normalization).
    pub fn new(class: Arc<dyn JobClass>, args: Vec<Arg>) -> Self {
        Self { class, args }
    }

    pub fn class(&self) -> &Arc<dyn JobClass> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn into_parts(self) -> (Arc<dyn JobClass>, Vec<Arg>) {
        (self.class, self.args)
    }

    /// JSON payload `{"class": ..., "args": [...]}`.
    pub fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(Payload {
            class: self.class_name(),
            args: &self.args,
        })
    }
}

impl fmt::Debug for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRecord")
            .field("class", &self.class_name())
            .field("args", &self.args)
            .finish()
    }
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"class\"=>{:?}, \"args\"=>{}}}",
            self.class_name(),
            inspect_args(&self.args)
        )
    }
}

/// Inspect form of a queue's contents, e.g. `[{"class"=>"MyJob", "args"=>[]}]`.
pub fn inspect_records<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let items: Vec<String> = records.into_iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Predicate shared by assertions and `dequeue`: same job type and, when
/// expected arguments are given, equal normalized arguments.
#[derive(Debug, Clone)]
pub struct JobMatcher {
    type_key: &'static str,
    args: Option<Vec<Arg>>,
}

impl JobMatcher {
    pub fn new(job: &dyn JobClass, expected: Option<&[Arg]>) -> Self {
        Self {
            type_key: job.type_key(),
            args: expected.map(normalize_all),
        }
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        record.class.type_key() == self.type_key
            && self
                .args
                .as_deref()
                .map_or(true, |args| record.args() == args)
    }
}
