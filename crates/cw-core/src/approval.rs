//! Approval request lifecycle and the JSON bodies exchanged with the
//! approval service.

use crate::plan::ActionPlan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a remote approval request.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Denied,
}

impl ApprovalStatus {
    /// Whether the request has been resolved.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Denied => "denied",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "denied" => Ok(ApprovalStatus::Denied),
            other => Err(format!("Unknown approval status: {}", other)),
        }
    }
}

/// Body of `POST <submit_url>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub account: String,
    pub proposed_actions: ActionPlan,
}

/// Successful response to a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Request id; absent or empty means the submission was not accepted.
    #[serde(default)]
    pub id: Option<String>,
}

/// Body returned by `GET <status_url>`.
///
/// `status` is kept as a raw string so unknown values can be treated as
/// still pending instead of failing to decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: String,
    /// Who resolved the request, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<String>,
}

impl StatusResponse {
    /// Parsed status; anything unrecognised reads as pending.
    pub fn parsed_status(&self) -> ApprovalStatus {
        self.status.parse().unwrap_or(ApprovalStatus::Pending)
    }
}

/// Body of `POST <callback_url>/{id}` sent by the approver UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackRequest {
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub approver: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("approved".parse::<ApprovalStatus>().unwrap(), ApprovalStatus::Approved);
        assert_eq!("DENIED".parse::<ApprovalStatus>().unwrap(), ApprovalStatus::Denied);
        assert!("maybe".parse::<ApprovalStatus>().is_err());
    }

    #[test]
    fn test_unknown_status_reads_pending() {
        let resp: StatusResponse = serde_json::from_str(r#"{"status": "escalated"}"#).unwrap();
        assert_eq!(resp.parsed_status(), ApprovalStatus::Pending);

        let resp: StatusResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(resp.parsed_status(), ApprovalStatus::Pending);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ApprovalStatus::Pending.is_terminal());
        assert!(ApprovalStatus::Approved.is_terminal());
        assert!(ApprovalStatus::Denied.is_terminal());
    }

    #[test]
    fn test_submission_response_missing_id() {
        let resp: SubmissionResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(resp.id.is_none());
    }
}
