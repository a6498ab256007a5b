//! Application state shared across handlers.

use crate::journal::ApprovalJournal;
use crate::store::InMemoryApprovalStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<InMemoryApprovalStore>,
    /// Optional on-disk journal of submissions and results.
    pub journal: Option<Arc<ApprovalJournal>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(mut self, dir: impl Into<PathBuf>) -> Self {
        self.journal = Some(Arc::new(ApprovalJournal::new(dir)));
        self
    }
}
