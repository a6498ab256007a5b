//! Configuration loading for the Containment Warden CLI.

use anyhow::{Context, Result};
use cw_observability::{AuditConfig, LoggingSettings};
use cw_policy::ApprovalConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const REDACTED: &str = "***REDACTED***";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub approval: ApprovalConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub approval_server: ApprovalServerSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Settings for the bundled approval service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory receiving the JSONL journal; disabled when unset.
    #[serde(default)]
    pub journal_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ApprovalServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            journal_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Loads `path`, falling back to defaults only when `path` is the implicit
    /// default location and nothing exists there. A file that exists but
    /// cannot be read or parsed is always an error.
    pub fn load_or_default(path: &Path, explicit: bool) -> Result<Self> {
        if !explicit {
            if let Err(e) = std::fs::metadata(path) {
                if e.kind() == std::io::ErrorKind::NotFound {
                    return Ok(Self::default());
                }
            }
        }
        Self::load(path)
    }

    /// Applies `CW_*` environment variables on top of the loaded values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary lookup. Unparseable values are
    /// ignored with a warning, except `CW_REQUIRE_APPROVAL`, which then
    /// requires approval.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CW_REQUIRE_APPROVAL") {
            match parse_flag(&value) {
                Some(flag) => self.approval.required = flag,
                None => {
                    warn!(value = %value, "Invalid CW_REQUIRE_APPROVAL; requiring approval");
                    self.approval.required = true;
                }
            }
        }
        if let Some(value) = lookup("CW_APPROVAL_MODE") {
            self.approval.mode = value;
        }
        if let Some(value) = lookup("CW_APPROVAL_SUBMIT_URL") {
            self.approval.webhook.submit_url = value;
        }
        if let Some(value) = lookup("CW_APPROVAL_STATUS_URL") {
            self.approval.webhook.status_url = value;
        }
        override_number(
            &lookup,
            "CW_APPROVAL_TIMEOUT_SECS",
            &mut self.approval.webhook.timeout_secs,
        );
        override_number(
            &lookup,
            "CW_APPROVAL_POLL_INTERVAL_MS",
            &mut self.approval.webhook.poll_interval_ms,
        );
        if let Some(value) = lookup("CW_AUDIT_LOG_PATH") {
            self.audit.path = PathBuf::from(value);
        }
        override_number(&lookup, "CW_AUDIT_MAX_BYTES", &mut self.audit.max_bytes);
        override_number(&lookup, "CW_AUDIT_BACKUP_COUNT", &mut self.audit.backup_count);
        if let Some(value) = lookup("CW_AUDIT_SIGNING_KEY") {
            self.audit.signing_key = Some(value).filter(|v| !v.is_empty());
        }
        if let Some(value) = lookup("CW_AUDIT_FORWARD_URL") {
            self.audit.forward_url = Some(value).filter(|v| !v.is_empty());
        }
    }

    /// Creates a copy with secrets redacted.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();
        if config.audit.signing_key.is_some() {
            config.audit.signing_key = Some(REDACTED.to_string());
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn override_number<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(value) = lookup(key) {
        match value.trim().parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(key = %key, value = %value, "Ignoring invalid numeric override"),
        }
    }
}
