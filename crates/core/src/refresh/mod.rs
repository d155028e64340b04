//! One fetch-and-persist refresh cycle.

mod refresh_executor;

pub use refresh_executor::{RefreshExecutor, RunOutcome, RunState};
