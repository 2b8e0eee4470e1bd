//! # eventdesk
//!
//! Approval tracking for an event-planning company.
//!
//! Customer requests move through a fixed chain of role-gated reviews, and
//! planners break approved events into sub-team tasks that each run their own
//! assignment, feedback, and review track. Everything is held in memory.
//!
//! Start from [`engine::Engine`] for the string-typed API, or borrow the typed
//! workflows in [`workflow`] directly.

pub mod authorizer;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod model;
pub mod query;
pub mod script;
pub mod store;
pub mod telemetry;
pub mod workflow;
