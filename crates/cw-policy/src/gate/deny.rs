use super::{ApprovalDecision, ApprovalGate};
use async_trait::async_trait;
use cw_core::ActionPlan;
use tracing::warn;

/// Denies every plan, reporting why the configured strategy is unusable.
#[derive(Debug, Clone)]
pub struct DenyAllGate {
    reason: String,
}

impl DenyAllGate {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ApprovalGate for DenyAllGate {
    fn name(&self) -> &str {
        "deny"
    }

    async fn decide(&self, account: &str, _plan: &ActionPlan) -> ApprovalDecision {
        warn!(account = %account, reason = %self.reason, "Denying containment");
        ApprovalDecision::denied(self.name())
    }
}
