//! Configuration validation for Containment Warden.

use crate::config::AppConfig;
use colored::Colorize;
use cw_policy::ApprovalMode;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Problems that make the configuration unusable as intended.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Prints the validation result to the console.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            println!();
            println!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                println!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            println!("  {} Configuration OK", "✓".green());
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();
        Self::validate_approval(config, &mut result);
        Self::validate_audit(config, &mut result);
        result
    }

    fn validate_approval(config: &AppConfig, result: &mut ValidationResult) {
        match config.approval.effective_mode() {
            ApprovalMode::Implicit => {
                if config.approval.required {
                    result.add_warning(
                        "approval.mode is 'implicit': every containment plan is approved",
                    );
                } else {
                    result.add_warning(
                        "approval.required is false: containment runs without supervisor approval",
                    );
                }
            }
            ApprovalMode::Interactive => {}
            ApprovalMode::Webhook => {
                for problem in config.approval.webhook.validate() {
                    result.add_error(format!("approval.{}", problem));
                }
            }
            ApprovalMode::Unknown(mode) => {
                result.add_error(format!(
                    "Unknown approval.mode '{}': every containment request will be denied. \
                     Use implicit, interactive or webhook.",
                    mode
                ));
            }
        }
    }

    fn validate_audit(config: &AppConfig, result: &mut ValidationResult) {
        for problem in config.audit.validate() {
            result.add_error(problem);
        }

        if config.audit.signing_key.is_none() {
            result.add_warning("audit.signing_key is not set: audit records are unsigned");
        }
        if config.audit.max_bytes == 0 {
            result.add_warning("audit.max_bytes is 0: the audit log is never rotated");
        }
    }
}
