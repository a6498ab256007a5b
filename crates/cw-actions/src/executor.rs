//! Remote action execution with per-action error isolation.

use cw_connectors::{
    ConnectorError, EmailGatewayConnector, IdentityConnector, NetworkSecurityConnector,
    SimulatedConnector,
};
use cw_core::ActionResult;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Runs individual containment actions against the configured connectors.
///
/// Every method returns a result record: connector errors are converted
/// into a record carrying `status: "failed"` and an `error` message, so one
/// failing action never prevents the next from being attempted.
#[derive(Clone)]
pub struct RemoteActionExecutor {
    identity: Arc<dyn IdentityConnector>,
    network: Arc<dyn NetworkSecurityConnector>,
    email: Arc<dyn EmailGatewayConnector>,
}

impl RemoteActionExecutor {
    pub fn new(
        identity: Arc<dyn IdentityConnector>,
        network: Arc<dyn NetworkSecurityConnector>,
        email: Arc<dyn EmailGatewayConnector>,
    ) -> Self {
        Self {
            identity,
            network,
            email,
        }
    }

    /// Uses one connector for every capability.
    pub fn from_connector<C>(connector: Arc<C>) -> Self
    where
        C: IdentityConnector + NetworkSecurityConnector + EmailGatewayConnector + 'static,
    {
        Self {
            identity: connector.clone(),
            network: connector.clone(),
            email: connector,
        }
    }

    /// Executor whose actions only report what would have been done.
    pub fn simulated() -> Self {
        Self::from_connector(Arc::new(SimulatedConnector::default()))
    }

    #[instrument(skip(self))]
    pub async fn isolate_account(&self, account: &str) -> ActionResult {
        settle(self.identity.name(), "isolate", self.identity.isolate_account(account).await)
    }

    #[instrument(skip(self))]
    pub async fn reset_password(&self, account: &str) -> ActionResult {
        settle(
            self.identity.name(),
            "reset_password",
            self.identity.reset_password(account).await,
        )
    }

    #[instrument(skip(self))]
    pub async fn enforce_mfa(&self, account: &str) -> ActionResult {
        settle(
            self.identity.name(),
            "enforce_mfa",
            self.identity.enforce_mfa(account).await,
        )
    }

    #[instrument(skip(self))]
    pub async fn block_domain(&self, domain: &str, account: &str) -> ActionResult {
        let reason = format!("Containment of compromised account {}", account);
        settle(
            self.network.name(),
            "block_domain",
            self.network.block_domain(domain, &reason).await,
        )
    }

    #[instrument(skip(self, targets), fields(targets = targets.len()))]
    pub async fn quarantine(&self, targets: &[String]) -> ActionResult {
        settle(
            self.email.name(),
            "quarantine",
            self.email.quarantine_messages(targets).await,
        )
    }
}

/// Failure records name the connector that raised the error.
fn settle(
    connector: &str,
    action: &str,
    outcome: Result<ActionResult, ConnectorError>,
) -> ActionResult {
    match outcome {
        Ok(result) => {
            info!(
                connector = %connector,
                action = %action,
                outcome = %result.action,
                "Containment action completed"
            );
            result
        }
        Err(e) => {
            warn!(connector = %connector, action = %action, error = %e, "Containment action failed");
            ActionResult::failure(action, e).with("connector", connector)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_connectors::MockConnector;

    #[tokio::test]
    async fn test_failure_becomes_error_record() {
        let mock = Arc::new(MockConnector::new("mock"));
        mock.fail_on("reset_password").await;
        let executor = RemoteActionExecutor::from_connector(mock.clone());

        let ok = executor.isolate_account("a@test").await;
        assert_eq!(ok.action, "suspended");
        assert!(!ok.is_error());

        let failed = executor.reset_password("a@test").await;
        assert_eq!(failed.action, "reset_password");
        assert_eq!(failed.get("status").and_then(|v| v.as_str()), Some("failed"));
        assert_eq!(failed.get("connector").and_then(|v| v.as_str()), Some("mock"));
        assert!(failed.is_error());
    }

    #[tokio::test]
    async fn test_simulated_executor() {
        let executor = RemoteActionExecutor::simulated();
        let result = executor.block_domain("bad.test", "a@test").await;
        assert_eq!(result.action, "blocked_simulated");
        assert_eq!(result.get("domain").and_then(|v| v.as_str()), Some("bad.test"));
    }
}
