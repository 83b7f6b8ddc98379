// Application Layer - Queue store, hook dispatch, runs and assertions

pub mod assertions;
pub mod hooks;
pub mod store;
pub mod worker;

// Re-exports
pub use hooks::Outcome;
pub use store::QueueStore;
pub use worker::RunReport;
