//! Dry-Run Harness: runs the reconciler against a config pull request's
//! candidate state and reports the outcome as a check run (spec §4.8).

pub mod errors;
pub mod harness;
pub mod queue;
mod svg;

pub use errors::Error;
pub use harness::DryRunRequest;
pub use queue::DryRunQueue;
