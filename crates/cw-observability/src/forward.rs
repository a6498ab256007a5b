//! Best-effort delivery of audit records to a remote collector.

use crate::audit::AuditError;
use crate::signing::SIGNATURE_HEADER;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Ships a serialized audit record somewhere other than the local file.
#[async_trait]
pub trait AuditForwarder: Send + Sync {
    /// Delivers `body` (the exact line written locally) and, when the record
    /// is signed, its signature.
    async fn forward(&self, body: &str, signature: Option<&str>) -> Result<(), AuditError>;
}

/// Posts each record as JSON to a collector URL.
pub struct HttpAuditForwarder {
    client: Client,
    url: String,
}

impl HttpAuditForwarder {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AuditError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuditError::Forward(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AuditForwarder for HttpAuditForwarder {
    async fn forward(&self, body: &str, signature: Option<&str>) -> Result<(), AuditError> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());
        if let Some(sig) = signature {
            request = request.header(SIGNATURE_HEADER, sig);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuditError::Forward(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Forward(format!(
                "collector returned HTTP {}",
                status.as_u16()
            )));
        }

        debug!(url = %self.url, "Audit record forwarded");
        Ok(())
    }
}
