//! In-memory store of approval requests.
//!
//! Each request sits behind its own mutex so resolving one request never
//! waits on another; the outer map lock is held only to look entries up or
//! insert new ones.

use chrono::{DateTime, Utc};
use cw_core::{ActionPlan, ApprovalStatus, SubmissionRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("approval request {0} not found")]
    NotFound(Uuid),

    #[error("approval request {id} is already {status}")]
    AlreadyResolved { id: Uuid, status: ApprovalStatus },
}

/// One submitted approval request and its resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub id: Uuid,
    pub account: String,
    pub proposed_actions: ActionPlan,
    pub status: ApprovalStatus,
    pub approver: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct InMemoryApprovalStore {
    records: RwLock<HashMap<Uuid, Arc<Mutex<ApprovalRecord>>>>,
}

impl InMemoryApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new pending request and returns it.
    pub async fn create(&self, request: SubmissionRequest) -> ApprovalRecord {
        let record = ApprovalRecord {
            id: Uuid::new_v4(),
            account: request.account,
            proposed_actions: request.proposed_actions,
            status: ApprovalStatus::Pending,
            approver: None,
            created_at: Utc::now(),
            resolved_at: None,
        };

        self.records
            .write()
            .await
            .insert(record.id, Arc::new(Mutex::new(record.clone())));
        info!(id = %record.id, account = %record.account, "Approval request created");
        record
    }

    pub async fn get(&self, id: Uuid) -> Result<ApprovalRecord, StoreError> {
        let entry = self.entry(id).await?;
        let record = entry.lock().await;
        Ok(record.clone())
    }

    /// Moves a pending request to approved or denied.
    ///
    /// A request that already left `pending` is never overwritten.
    pub async fn resolve(
        &self,
        id: Uuid,
        approved: bool,
        approver: Option<String>,
    ) -> Result<ApprovalRecord, StoreError> {
        let entry = self.entry(id).await?;
        let mut record = entry.lock().await;

        if record.status.is_terminal() {
            return Err(StoreError::AlreadyResolved {
                id,
                status: record.status,
            });
        }

        record.status = if approved {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Denied
        };
        record.approver = approver;
        record.resolved_at = Some(Utc::now());

        info!(id = %id, status = %record.status, "Approval request resolved");
        Ok(record.clone())
    }

    /// Ids of requests still awaiting a decision.
    pub async fn pending_ids(&self) -> Vec<Uuid> {
        let entries: Vec<_> = self.records.read().await.values().cloned().collect();
        let mut pending = Vec::new();
        for entry in entries {
            let record = entry.lock().await;
            if record.status == ApprovalStatus::Pending {
                pending.push(record.id);
            }
        }
        pending
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn entry(&self, id: Uuid) -> Result<Arc<Mutex<ApprovalRecord>>, StoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}
