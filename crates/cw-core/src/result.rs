//! Per-action outcome records and their aggregation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Outcome of a single remote containment action.
///
/// Free-form apart from the `action` discriminator, which names what the
/// remote side actually did (e.g. `suspended`, `blocked_simulated`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionResult {
    /// Action discriminator.
    pub action: String,
    /// Provider-specific details.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ActionResult {
    /// Creates a result with only the discriminator set.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            details: Map::new(),
        }
    }

    /// Adds a detail field.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Creates the record for an action whose executor call failed.
    pub fn failure(action: impl Into<String>, error: impl Display) -> Self {
        Self::new(action)
            .with("status", "failed")
            .with("error", error.to_string())
    }

    /// Whether this record carries an error indicator.
    pub fn is_error(&self) -> bool {
        self.details.contains_key("error")
    }

    /// Returns a detail field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Aggregated results of an executed containment plan, keyed by action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainmentResults {
    pub isolate: ActionResult,
    pub reset_password: ActionResult,
    pub enforce_mfa: ActionResult,
    /// Block results keyed by domain.
    pub blocked_domains: BTreeMap<String, ActionResult>,
    pub quarantine: ActionResult,
}

impl ContainmentResults {
    /// Number of actions that came back with an error indicator.
    pub fn error_count(&self) -> usize {
        [&self.isolate, &self.reset_password, &self.enforce_mfa, &self.quarantine]
            .into_iter()
            .chain(self.blocked_domains.values())
            .filter(|r| r.is_error())
            .count()
    }
}
