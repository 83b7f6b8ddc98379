// Inline Queue Core - Domain Logic, Ports & In-Process Engine
// NO broker, NO persistence, NO runtime - deterministic and single-threaded

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{Outcome, QueueStore, RunReport};
pub use config::StoreConfig;
pub use domain::{Arg, JobRecord, QueueName};
pub use error::{AssertionFailure, QueueError, Result};
pub use port::{Around, JobClass, JobResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
