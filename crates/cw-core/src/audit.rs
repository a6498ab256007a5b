//! Audit entry written once per orchestration call.

use crate::plan::ActionPlan;
use crate::result::ContainmentResults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final outcome recorded for a containment request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Approval was not granted; nothing ran.
    Denied,
    /// Approval was granted and every planned action was attempted.
    Executed,
}

/// Immutable record of what was proposed, whether it was approved and what ran.
///
/// The two constructors are the only way to build an entry, so `approved`
/// and `outcome` always agree and `results` exists only for executed plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    account: String,
    proposed_actions: ActionPlan,
    approved: bool,
    outcome: AuditOutcome,
    approval_strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    approver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<ContainmentResults>,
}

impl AuditEntry {
    /// Entry for a plan that was not approved.
    pub fn denied(plan: ActionPlan, strategy: &str, approver: Option<String>) -> Self {
        Self {
            timestamp: None,
            account: plan.account().to_string(),
            proposed_actions: plan,
            approved: false,
            outcome: AuditOutcome::Denied,
            approval_strategy: strategy.to_string(),
            approver,
            results: None,
        }
    }

    /// Entry for an approved plan together with every action result.
    pub fn executed(
        plan: ActionPlan,
        strategy: &str,
        approver: Option<String>,
        results: ContainmentResults,
    ) -> Self {
        Self {
            timestamp: None,
            account: plan.account().to_string(),
            proposed_actions: plan,
            approved: true,
            outcome: AuditOutcome::Executed,
            approval_strategy: strategy.to_string(),
            approver,
            results: Some(results),
        }
    }

    /// Sets an explicit timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Assigns the current UTC time unless a timestamp is already present.
    pub fn stamp_if_absent(&mut self) {
        if self.timestamp.is_none() {
            self.timestamp = Some(Utc::now());
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn proposed_actions(&self) -> &ActionPlan {
        &self.proposed_actions
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    pub fn approval_strategy(&self) -> &str {
        &self.approval_strategy
    }

    pub fn approver(&self) -> Option<&str> {
        self.approver.as_deref()
    }

    pub fn results(&self) -> Option<&ContainmentResults> {
        self.results.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Indicators;
    use crate::result::ActionResult;
    use std::collections::BTreeMap;

    fn plan() -> ActionPlan {
        ActionPlan::for_incident("victim@example.com", &Indicators::new())
    }

    #[test]
    fn test_denied_entry_has_no_results() {
        let entry = AuditEntry::denied(plan(), "webhook", Some("alice".into()));
        assert!(!entry.approved());
        assert_eq!(entry.outcome(), AuditOutcome::Denied);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["outcome"], "denied");
        assert!(json.get("results").is_none());
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_executed_entry() {
        let results = ContainmentResults {
            isolate: ActionResult::new("isolated"),
            reset_password: ActionResult::new("password_reset"),
            enforce_mfa: ActionResult::new("mfa_enforced"),
            blocked_domains: BTreeMap::new(),
            quarantine: ActionResult::new("quarantined"),
        };
        let entry = AuditEntry::executed(plan(), "implicit", None, results);
        assert!(entry.approved());
        assert_eq!(entry.outcome(), AuditOutcome::Executed);
        assert!(entry.results().is_some());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["outcome"], "executed");
        assert_eq!(json["results"]["isolate"]["action"], "isolated");
        assert!(json.get("approver").is_none());
    }

    #[test]
    fn test_stamp_if_absent_keeps_existing() {
        let fixed = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut entry = AuditEntry::denied(plan(), "implicit", None).with_timestamp(fixed);
        entry.stamp_if_absent();
        assert_eq!(entry.timestamp(), Some(fixed));

        let mut fresh = AuditEntry::denied(plan(), "implicit", None);
        fresh.stamp_if_absent();
        assert!(fresh.timestamp().is_some());
    }
}
