//! Contain command - runs one approval-gated containment request.

use anyhow::{bail, Context, Result};
use cw_actions::{ContainmentOrchestrator, RemoteActionExecutor};
use cw_core::{ContainmentReport, Indicators};
use cw_observability::AuditLogger;
use cw_policy::build_gate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;

/// Arguments of the `contain` command.
#[derive(Debug, Clone)]
pub struct ContainArgs {
    pub account: String,
    /// JSON file shaped like `{"urls": [...], "emails": [...]}`.
    pub indicators_file: Option<PathBuf>,
    pub urls: Vec<String>,
    pub emails: Vec<String>,
}

impl ContainArgs {
    /// Indicators from the file (if any) followed by the flag values.
    pub fn indicators(&self) -> Result<Indicators> {
        let mut indicators = match &self.indicators_file {
            Some(path) => {
                let contents = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read indicators file: {}", path.display())
                })?;
                serde_json::from_str::<Indicators>(&contents).with_context(|| {
                    format!("Failed to parse indicators file: {}", path.display())
                })?
            }
            None => Indicators::new(),
        };

        indicators.urls.extend(self.urls.iter().cloned());
        indicators.emails.extend(self.emails.iter().cloned());
        Ok(indicators)
    }
}

/// Builds the orchestrator from configuration and runs one request.
///
/// Actions go through the simulated connector; no provider integrations
/// ship with the CLI.
pub async fn run_contain(config: &AppConfig, args: ContainArgs) -> Result<ContainmentReport> {
    if args.account.trim().is_empty() {
        bail!("Account must not be empty");
    }
    let indicators = args.indicators()?;

    let gate = build_gate(&config.approval);
    let audit = AuditLogger::new(&config.audit).context("Failed to initialize audit logger")?;
    info!(
        gate = %gate.name(),
        audit_path = %audit.path().display(),
        "Containment pipeline ready"
    );

    let orchestrator =
        ContainmentOrchestrator::new(gate, RemoteActionExecutor::simulated(), Arc::new(audit));

    Ok(orchestrator.orchestrate(&args.account, &indicators).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_observability::{read_records, AuditConfig};

    fn args(dir: &std::path::Path) -> ContainArgs {
        let file = dir.join("indicators.json");
        std::fs::write(
            &file,
            r#"{"urls": ["https://bad.example.com/x"], "emails": ["victim@example.com"]}"#,
        )
        .unwrap();
        ContainArgs {
            account: "victim@example.com".to_string(),
            indicators_file: Some(file),
            urls: vec!["https://other.example.net/".to_string()],
            emails: vec![],
        }
    }

    #[test]
    fn test_indicators_merge_file_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let indicators = args(dir.path()).indicators().unwrap();
        assert_eq!(indicators.urls.len(), 2);
        assert_eq!(indicators.emails, vec!["victim@example.com"]);
    }

    #[tokio::test]
    async fn test_contain_with_implicit_approval() {
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("audit.log");
        let config = AppConfig {
            audit: AuditConfig {
                path: audit_path.clone(),
                ..AuditConfig::default()
            },
            ..AppConfig::default()
        };

        let report = run_contain(&config, args(dir.path())).await.unwrap();

        assert!(report.approved);
        let results = report.results.unwrap();
        assert_eq!(results.blocked_domains.len(), 2);
        assert_eq!(results.isolate.action, "isolated");
        assert_eq!(read_records(&audit_path).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_contain_with_unknown_mode_denies() {
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("audit.log");
        let mut config = AppConfig::default();
        config.approval.required = true;
        config.approval.mode = "email".to_string();
        config.audit.path = audit_path.clone();

        let report = run_contain(&config, args(dir.path())).await.unwrap();

        assert!(!report.approved);
        assert_eq!(report.reason.as_deref(), Some("supervisor_denied"));
        let line = read_records(&audit_path).await.unwrap().remove(0);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["outcome"], "denied");
        assert_eq!(value["approval_strategy"], "deny");
    }
}
