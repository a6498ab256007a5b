use super::{ApprovalDecision, ApprovalGate};
use async_trait::async_trait;
use cw_core::ActionPlan;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

type SharedInput = Arc<Mutex<Box<dyn BufRead + Send>>>;
type SharedOutput = Arc<Mutex<Box<dyn Write + Send>>>;

/// Asks an operator on a local terminal and blocks until they answer.
///
/// Only `y` / `yes` (case-insensitive) approve. Read failures and end of
/// input deny.
pub struct InteractiveApproval {
    input: SharedInput,
    output: SharedOutput,
}

impl InteractiveApproval {
    /// Creates a gate reading from `input` and prompting on `output`.
    pub fn new<R, W>(input: R, output: W) -> Self
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            input: Arc::new(Mutex::new(Box::new(input))),
            output: Arc::new(Mutex::new(Box::new(output))),
        }
    }

    /// Prompts on stderr and reads stdin.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }

    fn prompt(output: &SharedOutput, account: &str, lines: &[String]) -> io::Result<()> {
        let mut out = output
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "prompt output poisoned"))?;
        writeln!(out, "Supervisor approval required for containment on account: {}", account)?;
        writeln!(out, "Proposed actions:")?;
        for line in lines {
            writeln!(out, " - {}", line)?;
        }
        write!(out, "Approve containment? (yes/no): ")?;
        out.flush()
    }

    fn read_answer(input: &SharedInput) -> io::Result<String> {
        let mut reader = input
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "prompt input poisoned"))?;
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no answer given"));
        }
        Ok(line)
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ApprovalGate for InteractiveApproval {
    fn name(&self) -> &str {
        "interactive"
    }

    #[instrument(skip(self, plan))]
    async fn decide(&self, account: &str, plan: &ActionPlan) -> ApprovalDecision {
        let input = Arc::clone(&self.input);
        let output = Arc::clone(&self.output);
        let account_owned = account.to_string();
        let lines = plan.summary_lines();

        let answer = tokio::task::spawn_blocking(move || {
            Self::prompt(&output, &account_owned, &lines)?;
            Self::read_answer(&input)
        })
        .await;

        match answer {
            Ok(Ok(answer)) => {
                let approved = is_affirmative(&answer);
                info!(approved, "Interactive approval result");
                if approved {
                    ApprovalDecision::approved(self.name())
                } else {
                    ApprovalDecision::denied(self.name())
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Error while collecting interactive approval");
                ApprovalDecision::denied(self.name())
            }
            Err(e) => {
                warn!(error = %e, "Interactive approval task failed");
                ApprovalDecision::denied(self.name())
            }
        }
    }
}
