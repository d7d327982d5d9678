pub mod reconcile;
pub mod resolver;
mod service;

pub use reconcile::{CycleOutcome, ReconcileState, Reconciler, SkipReason};
pub use resolver::{
    lookup, resolve, resolve_target, Lookup, Resolution, ResolveError, ResolvedTarget,
};
pub use service::{log_fatal, run, run_with, RunOutcome};
