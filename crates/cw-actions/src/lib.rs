//! # cw-actions
//!
//! Containment execution for Containment Warden.
//!
//! [`ContainmentOrchestrator`] turns an account and its extracted
//! indicators into an approved (or denied) containment run, using
//! [`RemoteActionExecutor`] to reach the configured connectors.

pub mod executor;
pub mod orchestrator;

pub use executor::RemoteActionExecutor;
pub use orchestrator::ContainmentOrchestrator;
