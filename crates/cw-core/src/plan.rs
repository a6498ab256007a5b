//! Proposed containment plan for one incident.

use crate::indicators::Indicators;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of remediation actions proposed for one subject.
///
/// Built once per orchestration call and never mutated afterwards; it is
/// only persisted as part of an audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionPlan {
    account: String,
    isolate: bool,
    reset_password: bool,
    enforce_mfa: bool,
    blocked_domains: BTreeSet<String>,
    quarantine_targets: Vec<String>,
}

impl ActionPlan {
    /// Builds the standard containment plan for a compromised account.
    ///
    /// Account actions are always proposed. Domains come from the URL
    /// indicators; quarantine targets are the email indicators as given.
    pub fn for_incident(account: impl Into<String>, indicators: &Indicators) -> Self {
        Self {
            account: account.into(),
            isolate: true,
            reset_password: true,
            enforce_mfa: true,
            blocked_domains: indicators.domains(),
            quarantine_targets: indicators.emails.clone(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn isolate(&self) -> bool {
        self.isolate
    }

    pub fn reset_password(&self) -> bool {
        self.reset_password
    }

    pub fn enforce_mfa(&self) -> bool {
        self.enforce_mfa
    }

    /// Domains to block, sorted and deduplicated.
    pub fn blocked_domains(&self) -> &BTreeSet<String> {
        &self.blocked_domains
    }

    pub fn quarantine_targets(&self) -> &[String] {
        &self.quarantine_targets
    }

    /// One-line-per-action rendering used by the interactive prompt.
    pub fn summary_lines(&self) -> Vec<String> {
        let domains: Vec<&str> = self.blocked_domains.iter().map(String::as_str).collect();
        vec![
            format!("isolate: {}", self.isolate),
            format!("reset_password: {}", self.reset_password),
            format!("enforce_mfa: {}", self.enforce_mfa),
            format!("block_domains: [{}]", domains.join(", ")),
            format!("quarantine: [{}]", self.quarantine_targets.join(", ")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_for_incident() {
        let indicators = Indicators::new()
            .with_url("https://z.example.com/a")
            .with_url("https://a.example.com/b")
            .with_url("https://z.example.com/c")
            .with_email("victim@example.com")
            .with_email("victim@example.com");

        let plan = ActionPlan::for_incident("victim@example.com", &indicators);

        assert_eq!(plan.account(), "victim@example.com");
        assert!(plan.isolate() && plan.reset_password() && plan.enforce_mfa());
        let domains: Vec<_> = plan.blocked_domains().iter().cloned().collect();
        assert_eq!(domains, vec!["a.example.com", "z.example.com"]);
        // Quarantine targets are not deduplicated.
        assert_eq!(plan.quarantine_targets().len(), 2);
    }

    #[test]
    fn test_plan_serializes_domains_sorted() {
        let indicators = Indicators::new()
            .with_url("https://b.test/")
            .with_url("https://a.test/");
        let plan = ActionPlan::for_incident("user@corp.test", &indicators);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["blocked_domains"], serde_json::json!(["a.test", "b.test"]));
        assert_eq!(json["account"], "user@corp.test");
    }
}
