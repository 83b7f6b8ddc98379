// Port Layer - Contract a job class must satisfy

pub mod job_class;

// Re-exports
pub use job_class::{short_type_name, Around, JobClass, JobResult};
