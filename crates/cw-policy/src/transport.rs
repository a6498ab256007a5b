//! HTTP transport for the webhook approval strategy.

use async_trait::async_trait;
use cw_core::{StatusResponse, SubmissionRequest, SubmissionResponse};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors talking to the approval service. Every one of them ends in a
/// denial; they never leave the gate.
#[derive(Error, Debug)]
pub enum ApprovalError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Approval service returned HTTP {0}")]
    Rejected(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Approval service returned no request id")]
    MissingRequestId,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Submission and status calls against a remote approval service.
#[async_trait]
pub trait ApprovalTransport: Send + Sync {
    /// Submits a request and returns its id.
    async fn submit(&self, request: &SubmissionRequest) -> Result<String, ApprovalError>;

    /// Fetches the current status of a request.
    async fn status(&self, request_id: &str) -> Result<StatusResponse, ApprovalError>;
}

/// reqwest-based transport.
pub struct HttpApprovalTransport {
    client: reqwest::Client,
    submit_url: String,
    status_url: String,
}

impl HttpApprovalTransport {
    /// Creates a transport. `status_url` must contain an `{id}` placeholder.
    pub fn new(
        submit_url: impl Into<String>,
        status_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ApprovalError> {
        let submit_url = submit_url.into();
        let status_url = status_url.into();

        if submit_url.trim().is_empty() {
            return Err(ApprovalError::InvalidConfig(
                "submission URL cannot be empty".to_string(),
            ));
        }
        if !status_url.contains("{id}") {
            return Err(ApprovalError::InvalidConfig(format!(
                "status URL '{}' has no {{id}} placeholder",
                status_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ApprovalError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            submit_url,
            status_url,
        })
    }

    /// The id comes from the remote service and is encoded as a single path
    /// segment.
    fn status_url_for(&self, request_id: &str) -> String {
        self.status_url.replace("{id}", &urlencoding::encode(request_id))
    }
}

#[async_trait]
impl ApprovalTransport for HttpApprovalTransport {
    async fn submit(&self, request: &SubmissionRequest) -> Result<String, ApprovalError> {
        let response = self
            .client
            .post(&self.submit_url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApprovalError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApprovalError::Rejected(response.status().as_u16()));
        }

        let body: SubmissionResponse = response
            .json()
            .await
            .map_err(|e| ApprovalError::InvalidResponse(e.to_string()))?;

        body.id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ApprovalError::MissingRequestId)
    }

    async fn status(&self, request_id: &str) -> Result<StatusResponse, ApprovalError> {
        let url = self.status_url_for(request_id);
        debug!(url = %url, "Polling approval status");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApprovalError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApprovalError::Rejected(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ApprovalError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_url_substitution() {
        let transport = HttpApprovalTransport::new(
            "http://localhost:5000/request",
            "http://localhost:5000/status/{id}",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            transport.status_url_for("req-1"),
            "http://localhost:5000/status/req-1"
        );
    }

    #[test]
    fn test_status_url_encodes_request_id() {
        let transport = HttpApprovalTransport::new(
            "http://localhost:5000/request",
            "http://localhost:5000/status/{id}?verbose=1",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            transport.status_url_for("../admin?x=1 y#z"),
            "http://localhost:5000/status/..%2Fadmin%3Fx%3D1%20y%23z?verbose=1"
        );
    }

    #[test]
    fn test_rejects_status_url_without_placeholder() {
        let result = HttpApprovalTransport::new(
            "http://localhost:5000/request",
            "http://localhost:5000/status",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(ApprovalError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_submit_transport_failure() {
        // Nothing listens on port 9 (discard) in the test environment.
        let transport = HttpApprovalTransport::new(
            "http://127.0.0.1:9/request",
            "http://127.0.0.1:9/status/{id}",
            Duration::from_millis(500),
        )
        .unwrap();
        let plan = cw_core::ActionPlan::for_incident("a@test", &cw_core::Indicators::new());
        let request = SubmissionRequest {
            account: "a@test".to_string(),
            proposed_actions: plan,
        };
        assert!(transport.submit(&request).await.is_err());
    }
}
