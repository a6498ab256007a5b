//! Durable audit trail for containment decisions.
//!
//! [`AuditLogger`] appends one JSON object per line to a size-rotated file,
//! optionally signing each record with HMAC-SHA256 and forwarding it to a
//! remote collector. [`MemoryAuditRecorder`] keeps entries in memory for
//! embedding applications and tests.

use crate::forward::{AuditForwarder, HttpAuditForwarder};
use crate::rotation::RotatingFile;
use crate::signing::{sign_payload, SIGNATURE_FIELD};
use async_trait::async_trait;
use cw_core::AuditEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Errors raised while persisting or forwarding an audit record.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to serialize audit entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write audit log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to forward audit entry: {0}")]
    Forward(String),
}

/// Audit trail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Rotation threshold in bytes; 0 disables rotation.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Archives retained after rotation.
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,

    /// HMAC key; records are unsigned when absent.
    #[serde(default)]
    pub signing_key: Option<String>,

    #[serde(default)]
    pub forward_url: Option<String>,

    #[serde(default = "default_forward_timeout")]
    pub forward_timeout_secs: u64,
}

fn default_path() -> PathBuf {
    PathBuf::from("logs/containment-audit.log")
}

fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_backup_count() -> usize {
    3
}

fn default_forward_timeout() -> u64 {
    5
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_bytes: default_max_bytes(),
            backup_count: default_backup_count(),
            signing_key: None,
            forward_url: None,
            forward_timeout_secs: default_forward_timeout(),
        }
    }
}

impl AuditConfig {
    pub fn forward_timeout(&self) -> Duration {
        Duration::from_secs(self.forward_timeout_secs)
    }

    /// Returns a list of human-readable configuration problems.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.path.as_os_str().is_empty() {
            problems.push("audit.path must not be empty".to_string());
        }
        if matches!(self.signing_key.as_deref(), Some("")) {
            problems.push("audit.signing_key is set but empty".to_string());
        }
        if let Some(url) = &self.forward_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                problems.push(format!("audit.forward_url is not an HTTP URL: {}", url));
            }
        }
        problems
    }
}

/// Sink for the single audit entry each orchestration produces.
///
/// Recording never fails from the caller's point of view; implementations
/// log their own errors.
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    async fn record(&self, entry: AuditEntry);
}

/// File-backed audit logger.
pub struct AuditLogger {
    path: PathBuf,
    file: Mutex<RotatingFile>,
    signing_key: Option<Vec<u8>>,
    forwarder: Option<Arc<dyn AuditForwarder>>,
}

impl AuditLogger {
    /// Builds a logger writing to `config.path`. A forwarder is attached
    /// when `forward_url` is set.
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let forwarder: Option<Arc<dyn AuditForwarder>> = match &config.forward_url {
            Some(url) => Some(Arc::new(HttpAuditForwarder::new(
                url.clone(),
                config.forward_timeout(),
            )?)),
            None => None,
        };

        info!(
            path = %config.path.display(),
            signed = config.signing_key.is_some(),
            forwarding = forwarder.is_some(),
            "Audit logger initialized"
        );

        Ok(Self {
            path: config.path.clone(),
            file: Mutex::new(RotatingFile::new(
                config.path.clone(),
                config.max_bytes,
                config.backup_count,
            )),
            signing_key: config.signing_key.as_ref().map(|k| k.as_bytes().to_vec()),
            forwarder,
        })
    }

    /// Replaces the forwarder.
    pub fn with_forwarder(mut self, forwarder: Arc<dyn AuditForwarder>) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the entry and forwards it, reporting local write failures.
    ///
    /// A forwarding failure is logged and does not fail the call once the
    /// local write has succeeded.
    pub async fn try_record(&self, mut entry: AuditEntry) -> Result<(), AuditError> {
        entry.stamp_if_absent();
        let (line, signature) = self.render(&entry)?;

        {
            let file = self.file.lock().await;
            file.append_line(&line).await?;
        }

        if let Some(forwarder) = &self.forwarder {
            if let Err(e) = forwarder.forward(&line, signature.as_deref()).await {
                warn!(error = %e, "Audit forwarding failed; local record kept");
            }
        }

        Ok(())
    }

    /// Serializes the entry with sorted keys and, when a key is configured,
    /// adds the signature computed over that unsigned form.
    fn render(&self, entry: &AuditEntry) -> Result<(String, Option<String>), AuditError> {
        let mut value = serde_json::to_value(entry)?;
        let unsigned = serde_json::to_string(&value)?;

        let key = match &self.signing_key {
            Some(key) => key,
            None => return Ok((unsigned, None)),
        };

        let signature = sign_payload(key, &unsigned);
        if let Value::Object(map) = &mut value {
            map.insert(SIGNATURE_FIELD.to_string(), Value::String(signature.clone()));
        }
        Ok((serde_json::to_string(&value)?, Some(signature)))
    }
}

#[async_trait]
impl AuditRecorder for AuditLogger {
    async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.try_record(entry).await {
            warn!(error = %e, "Failed to record audit entry");
        }
    }
}

/// Audit recorder with bounded in-memory storage.
#[derive(Clone)]
pub struct MemoryAuditRecorder {
    entries: Arc<RwLock<VecDeque<AuditEntry>>>,
    max_entries: usize,
}

impl MemoryAuditRecorder {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(max_entries))),
            max_entries,
        }
    }

    /// Returns all retained entries, oldest first.
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for MemoryAuditRecorder {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl AuditRecorder for MemoryAuditRecorder {
    async fn record(&self, mut entry: AuditEntry) {
        entry.stamp_if_absent();
        info!(
            account = %entry.account(),
            approved = entry.approved(),
            outcome = ?entry.outcome(),
            "Audit: containment request"
        );

        let mut entries = self.entries.write().await;
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
    }
}

/// Reads an audit file back into raw lines, skipping blanks.
pub async fn read_records(path: &Path) -> Result<Vec<String>, AuditError> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
