//! # cw-core
//!
//! Core data model for Containment Warden.
//!
//! This crate holds the types shared by every other crate: extracted
//! indicators, the containment action plan, per-action results, the audit
//! entry written once per orchestration, and the approval wire format.

pub mod approval;
pub mod audit;
pub mod indicators;
pub mod plan;
pub mod report;
pub mod result;

pub use approval::{
    ApprovalStatus, CallbackRequest, StatusResponse, SubmissionRequest, SubmissionResponse,
};
pub use audit::{AuditEntry, AuditOutcome};
pub use indicators::{derive_domains, Indicators};
pub use plan::ActionPlan;
pub use report::{ContainmentReport, DENIAL_REASON};
pub use result::{ActionResult, ContainmentResults};
