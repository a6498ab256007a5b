//! Simulated connector used when no provider is configured.
//!
//! Every call succeeds and reports what would have been done. Selecting it
//! is an explicit configuration choice, never a fallback after a failure.

use crate::traits::{
    Connector, ConnectorResult, EmailGatewayConnector, IdentityConnector, NetworkSecurityConnector,
};
use async_trait::async_trait;
use cw_core::ActionResult;
use tracing::info;

const SIMULATED_DETAILS: &str = "simulated - no provider configured";

/// Connector that implements every containment capability as a no-op.
#[derive(Debug, Clone)]
pub struct SimulatedConnector {
    name: String,
}

impl SimulatedConnector {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Default for SimulatedConnector {
    fn default() -> Self {
        Self::new("simulated")
    }
}

impl Connector for SimulatedConnector {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl IdentityConnector for SimulatedConnector {
    async fn isolate_account(&self, account: &str) -> ConnectorResult<ActionResult> {
        info!(account = %account, "Simulating account isolation");
        Ok(ActionResult::new("isolated")
            .with("account", account)
            .with("details", SIMULATED_DETAILS))
    }

    async fn reset_password(&self, account: &str) -> ConnectorResult<ActionResult> {
        info!(account = %account, "Simulating password reset");
        Ok(ActionResult::new("password_reset_simulated").with("account", account))
    }

    async fn enforce_mfa(&self, account: &str) -> ConnectorResult<ActionResult> {
        info!(account = %account, "Simulating MFA enforcement");
        Ok(ActionResult::new("enforce_mfa_simulated").with("account", account))
    }
}

#[async_trait]
impl NetworkSecurityConnector for SimulatedConnector {
    async fn block_domain(&self, domain: &str, reason: &str) -> ConnectorResult<ActionResult> {
        info!(domain = %domain, reason = %reason, "Simulating domain block");
        Ok(ActionResult::new("blocked_simulated").with("domain", domain))
    }
}

#[async_trait]
impl EmailGatewayConnector for SimulatedConnector {
    async fn quarantine_messages(&self, targets: &[String]) -> ConnectorResult<ActionResult> {
        info!(count = targets.len(), "Simulating mail quarantine");
        Ok(ActionResult::new("quarantine_simulated").with("quarantined", targets.to_vec()))
    }
}
