//! Approval-gated containment workflow.

use crate::executor::RemoteActionExecutor;
use cw_core::{ActionPlan, AuditEntry, ContainmentReport, ContainmentResults, Indicators};
use cw_observability::{containment_span, AuditRecorder};
use cw_policy::ApprovalGate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

/// Builds the plan, asks for approval, runs the actions and records the
/// audit entry.
pub struct ContainmentOrchestrator {
    gate: Arc<dyn ApprovalGate>,
    executor: RemoteActionExecutor,
    audit: Arc<dyn AuditRecorder>,
}

impl ContainmentOrchestrator {
    pub fn new(
        gate: Arc<dyn ApprovalGate>,
        executor: RemoteActionExecutor,
        audit: Arc<dyn AuditRecorder>,
    ) -> Self {
        Self {
            gate,
            executor,
            audit,
        }
    }

    /// Runs one containment request for `account`.
    ///
    /// Exactly one audit entry is recorded per call. A denied plan runs no
    /// actions; an approved plan attempts every action in order
    /// (isolate, reset password, enforce MFA, block each domain in sorted
    /// order, quarantine) regardless of individual failures.
    pub async fn orchestrate(&self, account: &str, indicators: &Indicators) -> ContainmentReport {
        let span = containment_span!(account);
        self.run(account, indicators).instrument(span).await
    }

    async fn run(&self, account: &str, indicators: &Indicators) -> ContainmentReport {
        let plan = ActionPlan::for_incident(account, indicators);
        info!(
            gate = %self.gate.name(),
            domains = plan.blocked_domains().len(),
            quarantine_targets = plan.quarantine_targets().len(),
            "Requesting containment approval"
        );

        let decision = self.gate.decide(account, &plan).await;

        if !decision.approved {
            info!(strategy = %decision.strategy, "Containment denied");
            let entry = AuditEntry::denied(plan, &decision.strategy, decision.approver);
            self.audit.record(entry).await;
            return ContainmentReport::denied();
        }

        let results = self.execute(&plan).await;
        let failures = results.error_count();
        if failures > 0 {
            warn!(failures, "Containment executed with failed actions");
        } else {
            info!("Containment executed");
        }

        let entry =
            AuditEntry::executed(plan, &decision.strategy, decision.approver, results.clone());
        self.audit.record(entry).await;

        ContainmentReport::executed(results)
    }

    async fn execute(&self, plan: &ActionPlan) -> ContainmentResults {
        let account = plan.account();

        let isolate = self.executor.isolate_account(account).await;
        let reset_password = self.executor.reset_password(account).await;
        let enforce_mfa = self.executor.enforce_mfa(account).await;

        let mut blocked_domains = BTreeMap::new();
        for domain in plan.blocked_domains() {
            let result = self.executor.block_domain(domain, account).await;
            blocked_domains.insert(domain.clone(), result);
        }

        let quarantine = self.executor.quarantine(plan.quarantine_targets()).await;

        ContainmentResults {
            isolate,
            reset_password,
            enforce_mfa,
            blocked_domains,
            quarantine,
        }
    }
}
