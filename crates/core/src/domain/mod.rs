// Domain Layer - Job arguments, records and queues

pub mod args;
pub mod job;
pub mod normalize;
pub mod queue;

// Re-exports
pub use args::{inspect_args, Arg};
pub use job::{inspect_records, JobMatcher, JobRecord};
pub use normalize::{normalize, normalize_all};
pub use queue::{Queue, QueueName};
