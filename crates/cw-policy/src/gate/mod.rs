//! Approval gate strategies.
//!
//! A gate answers one question per orchestration call: may this plan run?
//! Absence of approval is a normal answer, never an error. Every ambiguous
//! path (unknown mode, transport failure, timeout) resolves to a denial.

mod deny;
mod implicit;
mod interactive;
mod webhook;

pub use deny::DenyAllGate;
pub use implicit::ImplicitApproval;
pub use interactive::InteractiveApproval;
pub use webhook::WebhookApproval;

use crate::config::{ApprovalConfig, ApprovalMode};
use crate::transport::HttpApprovalTransport;
use async_trait::async_trait;
use cw_core::ActionPlan;
use std::sync::Arc;
use tracing::warn;

/// Outcome of one approval gate invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalDecision {
    /// Whether the plan may run.
    pub approved: bool,
    /// Name of the strategy that decided.
    pub strategy: String,
    /// Approver identity, when the strategy knows it.
    pub approver: Option<String>,
    /// Remote request id (webhook strategy only).
    pub request_id: Option<String>,
}

impl ApprovalDecision {
    pub fn approved(strategy: &str) -> Self {
        Self {
            approved: true,
            strategy: strategy.to_string(),
            approver: None,
            request_id: None,
        }
    }

    pub fn denied(strategy: &str) -> Self {
        Self {
            approved: false,
            strategy: strategy.to_string(),
            approver: None,
            request_id: None,
        }
    }

    pub fn with_approver(mut self, approver: Option<String>) -> Self {
        self.approver = approver;
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Decides whether a proposed containment plan may proceed.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    /// Strategy name recorded in audit entries.
    fn name(&self) -> &str;

    /// Returns the decision for `plan`. Must not fail.
    async fn decide(&self, account: &str, plan: &ActionPlan) -> ApprovalDecision;
}

/// Builds the gate selected by configuration.
pub fn build_gate(config: &ApprovalConfig) -> Arc<dyn ApprovalGate> {
    match config.effective_mode() {
        ApprovalMode::Implicit => Arc::new(ImplicitApproval),
        ApprovalMode::Interactive => Arc::new(InteractiveApproval::stdio()),
        ApprovalMode::Webhook => {
            let webhook = &config.webhook;
            match HttpApprovalTransport::new(
                webhook.submit_url.clone(),
                webhook.status_url.clone(),
                webhook.request_timeout(),
            ) {
                Ok(transport) => Arc::new(WebhookApproval::new(
                    Arc::new(transport),
                    webhook.poll_interval(),
                    webhook.timeout(),
                )),
                Err(e) => {
                    warn!(error = %e, "Webhook approval misconfigured; denying by default");
                    Arc::new(DenyAllGate::new(format!("webhook misconfigured: {}", e)))
                }
            }
        }
        ApprovalMode::Unknown(mode) => {
            warn!("Unknown approval mode '{}'; denying by default", mode);
            Arc::new(DenyAllGate::new(format!("unknown approval mode '{}'", mode)))
        }
    }
}
