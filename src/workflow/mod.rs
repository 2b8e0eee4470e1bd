//! Workflow state machines.
//!
//! Each workflow borrows its store mutably for as long as it lives, so the
//! borrow checker serializes all transitions on that store. Mutating calls
//! return `Ok(None)` when refused and `Err` only for malformed payloads.

pub mod event_request;
pub mod task_distribution;

pub use event_request::EventRequestWorkflow;
pub use task_distribution::TaskDistributionWorkflow;
