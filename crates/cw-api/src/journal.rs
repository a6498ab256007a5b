//! Append-only JSONL journal of approval submissions and resolutions.

use crate::store::ApprovalRecord;
use serde_json::json;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

pub const REQUESTS_FILE: &str = "approval_requests.jsonl";
pub const RESULTS_FILE: &str = "approval_results.jsonl";

/// Best-effort journal: write failures are logged and never fail a request.
pub struct ApprovalJournal {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl ApprovalJournal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn record_submission(&self, record: &ApprovalRecord) {
        let line = json!({
            "id": record.id,
            "account": record.account,
            "proposed_actions": record.proposed_actions,
            "created_at": record.created_at,
        });
        self.append(REQUESTS_FILE, &line).await;
    }

    pub async fn record_resolution(&self, record: &ApprovalRecord) {
        let line = json!({
            "id": record.id,
            "status": record.status,
            "approver": record.approver,
            "resolved_at": record.resolved_at,
        });
        self.append(RESULTS_FILE, &line).await;
    }

    async fn append(&self, file: &str, line: &serde_json::Value) {
        let _guard = self.lock.lock().await;
        if let Err(e) = self.try_append(file, line).await {
            warn!(file = %file, error = %e, "Failed to write approval journal");
        }
    }

    async fn try_append(&self, file: &str, line: &serde_json::Value) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(file))
            .await?;
        handle.write_all(format!("{}\n", line).as_bytes()).await?;
        handle.flush().await
    }
}
