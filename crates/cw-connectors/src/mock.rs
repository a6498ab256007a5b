//! Mock connector for testing.
//!
//! Records every call in order and can be told to fail specific operations.

use crate::traits::{
    Connector, ConnectorError, ConnectorResult, EmailGatewayConnector, IdentityConnector,
    NetworkSecurityConnector,
};
use async_trait::async_trait;
use cw_core::ActionResult;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct MockConnector {
    name: String,
    calls: Arc<RwLock<Vec<String>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl MockConnector {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Makes calls to `operation` return an error. For `block_domain` the
    /// operation may be `block_domain:<domain>` to fail a single domain.
    pub async fn fail_on(&self, operation: &str) {
        self.failing.write().await.insert(operation.to_string());
    }

    /// Calls recorded so far, as `operation:argument`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn record(&self, operation: &str, argument: &str) -> ConnectorResult<()> {
        self.calls
            .write()
            .await
            .push(format!("{}:{}", operation, argument));

        let failing = self.failing.read().await;
        if failing.contains(operation) || failing.contains(&format!("{}:{}", operation, argument)) {
            return Err(ConnectorError::RequestFailed(format!(
                "mock failure for {}",
                operation
            )));
        }
        Ok(())
    }
}

impl Connector for MockConnector {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl IdentityConnector for MockConnector {
    async fn isolate_account(&self, account: &str) -> ConnectorResult<ActionResult> {
        self.record("isolate", account).await?;
        Ok(ActionResult::new("suspended").with("account", account))
    }

    async fn reset_password(&self, account: &str) -> ConnectorResult<ActionResult> {
        self.record("reset_password", account).await?;
        Ok(ActionResult::new("password_reset").with("account", account))
    }

    async fn enforce_mfa(&self, account: &str) -> ConnectorResult<ActionResult> {
        self.record("enforce_mfa", account).await?;
        Ok(ActionResult::new("mfa_enforced").with("account", account))
    }
}

#[async_trait]
impl NetworkSecurityConnector for MockConnector {
    async fn block_domain(&self, domain: &str, _reason: &str) -> ConnectorResult<ActionResult> {
        self.record("block_domain", domain).await?;
        Ok(ActionResult::new("blocked").with("domain", domain))
    }
}

#[async_trait]
impl EmailGatewayConnector for MockConnector {
    async fn quarantine_messages(&self, targets: &[String]) -> ConnectorResult<ActionResult> {
        self.record("quarantine", &targets.join(",")).await?;
        Ok(ActionResult::new("quarantined").with("quarantined", targets.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let c = MockConnector::new("mock");
        c.isolate_account("a@test").await.unwrap();
        c.block_domain("x.test", "r").await.unwrap();

        assert_eq!(c.calls().await, vec!["isolate:a@test", "block_domain:x.test"]);
    }

    #[tokio::test]
    async fn test_fail_single_domain() {
        let c = MockConnector::new("mock");
        c.fail_on("block_domain:bad.test").await;

        assert!(c.block_domain("bad.test", "r").await.is_err());
        assert!(c.block_domain("ok.test", "r").await.is_ok());
        assert_eq!(c.call_count().await, 2);
    }
}
