//! Re-exports the worker coordinator.

mod coordinator;

pub use coordinator::{PrimalityResult, PrimalityTask, WorkerCoordinator};
