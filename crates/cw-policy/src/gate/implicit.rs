use super::{ApprovalDecision, ApprovalGate};
use async_trait::async_trait;
use cw_core::ActionPlan;
use tracing::debug;

/// Approves every plan. Used when approval enforcement is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitApproval;

#[async_trait]
impl ApprovalGate for ImplicitApproval {
    fn name(&self) -> &str {
        "implicit"
    }

    async fn decide(&self, account: &str, _plan: &ActionPlan) -> ApprovalDecision {
        debug!(account = %account, "Approval not required by configuration");
        ApprovalDecision::approved(self.name())
    }
}
