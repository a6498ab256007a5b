use super::{ApprovalDecision, ApprovalGate};
use crate::transport::ApprovalTransport;
use async_trait::async_trait;
use cw_core::{ActionPlan, ApprovalStatus, SubmissionRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, instrument, warn};

/// Submits the plan to a remote approval service and polls until it is
/// approved, denied, or the deadline passes.
///
/// The deadline is fixed once the submission is accepted; each iteration
/// works with whatever time is left rather than a fresh budget.
pub struct WebhookApproval {
    transport: Arc<dyn ApprovalTransport>,
    poll_interval: Duration,
    timeout: Duration,
}

impl WebhookApproval {
    pub fn new(
        transport: Arc<dyn ApprovalTransport>,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            poll_interval,
            timeout,
        }
    }
}

#[async_trait]
impl ApprovalGate for WebhookApproval {
    fn name(&self) -> &str {
        "webhook"
    }

    #[instrument(skip(self, plan))]
    async fn decide(&self, account: &str, plan: &ActionPlan) -> ApprovalDecision {
        let request = SubmissionRequest {
            account: account.to_string(),
            proposed_actions: plan.clone(),
        };

        let request_id = match self.transport.submit(&request).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Failed to submit approval request; denying");
                return ApprovalDecision::denied(self.name());
            }
        };
        info!(request_id = %request_id, "Approval request submitted");

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match timeout(remaining, self.transport.status(&request_id)).await {
                Ok(Ok(response)) => match response.parsed_status() {
                    ApprovalStatus::Approved => {
                        info!(request_id = %request_id, "Webhook approval received");
                        return ApprovalDecision::approved(self.name())
                            .with_approver(response.approver)
                            .with_request_id(request_id);
                    }
                    ApprovalStatus::Denied => {
                        info!(request_id = %request_id, "Webhook denial received");
                        return ApprovalDecision::denied(self.name())
                            .with_approver(response.approver)
                            .with_request_id(request_id);
                    }
                    ApprovalStatus::Pending => {
                        debug!(request_id = %request_id, "Approval still pending");
                    }
                },
                Ok(Err(e)) => {
                    debug!(request_id = %request_id, error = %e, "Waiting for approval callback");
                }
                Err(_) => {
                    debug!(request_id = %request_id, "Status poll ran past the deadline");
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            sleep(self.poll_interval.min(remaining)).await;
        }

        warn!(request_id = %request_id, "Approval webhook timed out; denying");
        ApprovalDecision::denied(self.name()).with_request_id(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ApprovalError;
    use cw_core::{Indicators, StatusResponse};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Transport replaying a scripted sequence of status answers. Once the
    /// script is exhausted it keeps answering `pending`.
    struct ScriptedTransport {
        submit: Result<String, ()>,
        statuses: Mutex<VecDeque<Result<&'static str, ()>>>,
        polls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(submit: Result<&str, ()>, statuses: Vec<Result<&'static str, ()>>) -> Self {
            Self {
                submit: submit.map(str::to_string),
                statuses: Mutex::new(statuses.into()),
                polls: AtomicUsize::new(0),
            }
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ApprovalTransport for ScriptedTransport {
        async fn submit(&self, _request: &SubmissionRequest) -> Result<String, ApprovalError> {
            self.submit
                .clone()
                .map_err(|_| ApprovalError::Transport("connection refused".to_string()))
        }

        async fn status(&self, request_id: &str) -> Result<StatusResponse, ApprovalError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let next = self.statuses.lock().await.pop_front().unwrap_or(Ok("pending"));
            match next {
                Ok(status) => Ok(StatusResponse {
                    id: Some(request_id.to_string()),
                    status: status.to_string(),
                    approver: (status != "pending").then(|| "supervisor".to_string()),
                }),
                Err(()) => Err(ApprovalError::Transport("reset by peer".to_string())),
            }
        }
    }

    fn plan() -> ActionPlan {
        ActionPlan::for_incident("victim@example.com", &Indicators::new())
    }

    fn gate(transport: Arc<ScriptedTransport>) -> WebhookApproval {
        WebhookApproval::new(transport, Duration::from_secs(1), Duration::from_secs(5))
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_then_approved() {
        let transport = Arc::new(ScriptedTransport::new(
            Ok("req-1"),
            vec![Ok("pending"), Ok("approved")],
        ));
        let decision = gate(transport.clone()).decide("victim@example.com", &plan()).await;

        assert!(decision.approved);
        assert_eq!(decision.request_id.as_deref(), Some("req-1"));
        assert_eq!(decision.approver.as_deref(), Some("supervisor"));
        assert_eq!(transport.polls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_denial() {
        let transport = Arc::new(ScriptedTransport::new(Ok("req-2"), vec![Ok("denied")]));
        let decision = gate(transport.clone()).decide("victim@example.com", &plan()).await;

        assert!(!decision.approved);
        assert_eq!(transport.polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_denies_and_stops_polling() {
        let transport = Arc::new(ScriptedTransport::new(Ok("req-3"), vec![]));
        let started = Instant::now();
        let decision = gate(transport.clone()).decide("victim@example.com", &plan()).await;

        assert!(!decision.approved);
        // Polls at t = 0, 1, 2, 3, 4; the deadline is reached at t = 5.
        assert_eq!(transport.polls(), 5);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(6));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(transport.polls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_errors_are_treated_as_pending() {
        let transport = Arc::new(ScriptedTransport::new(
            Ok("req-4"),
            vec![Err(()), Err(()), Ok("approved")],
        ));
        let decision = gate(transport.clone()).decide("victim@example.com", &plan()).await;

        assert!(decision.approved);
        assert_eq!(transport.polls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_failure_denies_without_polling() {
        let transport = Arc::new(ScriptedTransport::new(Err(()), vec![Ok("approved")]));
        let decision = gate(transport.clone()).decide("victim@example.com", &plan()).await;

        assert!(!decision.approved);
        assert_eq!(transport.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_keeps_polling() {
        let transport = Arc::new(ScriptedTransport::new(
            Ok("req-5"),
            vec![Ok("escalated"), Ok("denied")],
        ));
        let decision = gate(transport.clone()).decide("victim@example.com", &plan()).await;

        assert!(!decision.approved);
        assert_eq!(transport.polls(), 2);
    }
}
