//! # cw-policy
//!
//! Approval gate for Containment Warden.
//!
//! This crate decides whether a proposed containment plan may run. The
//! strategy (implicit, interactive prompt, or asynchronous webhook) is
//! selected by configuration when the gate is built, and every error path
//! resolves to a denial.

pub mod config;
pub mod gate;
pub mod transport;

pub use config::{ApprovalConfig, ApprovalMode, WebhookConfig};
pub use gate::{
    build_gate, ApprovalDecision, ApprovalGate, DenyAllGate, ImplicitApproval,
    InteractiveApproval, WebhookApproval,
};
pub use transport::{ApprovalError, ApprovalTransport, HttpApprovalTransport};
