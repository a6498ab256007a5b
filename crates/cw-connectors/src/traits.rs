//! Connector trait definitions for Containment Warden.
//!
//! Each containment action is an opaque remote call: the orchestrator only
//! needs a structured [`ActionResult`] back or a [`ConnectorError`].

use async_trait::async_trait;
use cw_core::ActionResult;
use thiserror::Error;

/// Errors that can occur in connectors.
#[derive(Error, Debug, Clone)]
pub enum ConnectorError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Base trait for all connectors.
pub trait Connector: Send + Sync {
    /// Returns the connector name.
    fn name(&self) -> &str;
}

/// Identity provider operations used during containment.
#[async_trait]
pub trait IdentityConnector: Connector {
    /// Suspends or disables the account.
    async fn isolate_account(&self, account: &str) -> ConnectorResult<ActionResult>;

    /// Forces a password reset for the account.
    async fn reset_password(&self, account: &str) -> ConnectorResult<ActionResult>;

    /// Requires MFA enrolment for the account.
    async fn enforce_mfa(&self, account: &str) -> ConnectorResult<ActionResult>;
}

/// Network security operations (DNS / proxy block lists).
#[async_trait]
pub trait NetworkSecurityConnector: Connector {
    /// Blocks a domain.
    async fn block_domain(&self, domain: &str, reason: &str) -> ConnectorResult<ActionResult>;
}

/// Mail gateway operations.
#[async_trait]
pub trait EmailGatewayConnector: Connector {
    /// Quarantines messages related to the given addresses in one call.
    async fn quarantine_messages(&self, targets: &[String]) -> ConnectorResult<ActionResult>;
}
