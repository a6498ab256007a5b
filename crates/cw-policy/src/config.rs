//! Approval configuration.
//!
//! The mode is kept as free text so an unrecognised value survives loading
//! and is resolved to a denying gate at construction time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Recognised approval strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalMode {
    /// Always approve.
    Implicit,
    /// Prompt an operator on the local terminal.
    Interactive,
    /// Submit to a remote approval service and poll for the decision.
    Webhook,
    /// Anything else; always denied.
    Unknown(String),
}

impl ApprovalMode {
    /// Parses a configured mode name. Never fails.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "implicit" | "none" => ApprovalMode::Implicit,
            "interactive" | "cli" => ApprovalMode::Interactive,
            "webhook" | "asynchronous-webhook" | "async-webhook" => ApprovalMode::Webhook,
            other => ApprovalMode::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ApprovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalMode::Implicit => write!(f, "implicit"),
            ApprovalMode::Interactive => write!(f, "interactive"),
            ApprovalMode::Webhook => write!(f, "webhook"),
            ApprovalMode::Unknown(m) => write!(f, "unknown({})", m),
        }
    }
}

/// Approval gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    /// When false every plan is approved implicitly.
    #[serde(default)]
    pub required: bool,

    /// Strategy used when approval is required.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Webhook strategy settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

fn default_mode() -> String {
    "interactive".to_string()
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            required: false,
            mode: default_mode(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl ApprovalConfig {
    /// The strategy that will actually be used.
    pub fn effective_mode(&self) -> ApprovalMode {
        if !self.required {
            return ApprovalMode::Implicit;
        }
        ApprovalMode::parse(&self.mode)
    }
}

/// Settings for the asynchronous webhook strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Submission endpoint.
    #[serde(default = "default_submit_url")]
    pub submit_url: String,

    /// Status endpoint; `{id}` is replaced by the request id.
    #[serde(default = "default_status_url")]
    pub status_url: String,

    /// Total time to wait for a decision (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Delay between status polls (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout for each individual HTTP request (seconds).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_submit_url() -> String {
    "http://localhost:5000/request".to_string()
}

fn default_status_url() -> String {
    "http://localhost:5000/status/{id}".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    5
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            submit_url: default_submit_url(),
            status_url: default_status_url(),
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the problems that would make the webhook gate deny everything.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.submit_url.trim().is_empty() {
            problems.push("webhook.submit_url is empty".to_string());
        }
        if !self.status_url.contains("{id}") {
            problems.push("webhook.status_url must contain an {id} placeholder".to_string());
        }
        if self.timeout_secs == 0 {
            problems.push("webhook.timeout_secs must be greater than zero".to_string());
        }
        if self.poll_interval_ms == 0 {
            problems.push("webhook.poll_interval_ms must be greater than zero".to_string());
        }
        problems
    }
}
