//! Result returned to the caller of an orchestration.

use crate::result::ContainmentResults;
use serde::{Deserialize, Serialize};

/// Reason reported when the approval gate does not grant approval.
pub const DENIAL_REASON: &str = "supervisor_denied";

/// Caller-facing containment result.
///
/// Serializes as `{"approved": false, "reason": "supervisor_denied"}` or
/// `{"approved": true, "results": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainmentReport {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ContainmentResults>,
}

impl ContainmentReport {
    pub fn denied() -> Self {
        Self {
            approved: false,
            reason: Some(DENIAL_REASON.to_string()),
            results: None,
        }
    }

    pub fn executed(results: ContainmentResults) -> Self {
        Self {
            approved: true,
            reason: None,
            results: Some(results),
        }
    }
}
