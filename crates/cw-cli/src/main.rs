//! Containment Warden CLI
//!
//! Runs approval-gated account containment and the reference approval
//! service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use cw_core::{ActionResult, ContainmentReport};
use std::path::PathBuf;

mod commands;
mod config;
mod validator;

use commands::{run_approval_server, run_contain, ContainArgs};
use config::AppConfig;
use validator::ConfigValidator;

#[derive(Parser)]
#[command(name = "containment-warden")]
#[command(author = "Containment Warden Team")]
#[command(version)]
#[command(about = "Approval-gated account containment with a signed audit trail", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Contain a compromised account (approval-gated)
    Contain {
        /// Account to contain
        account: String,

        /// JSON file with extracted indicators ({"urls": [...], "emails": [...]})
        #[arg(short, long, value_name = "FILE")]
        indicators: Option<PathBuf>,

        /// URL indicator (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,

        /// Message or mailbox to quarantine (repeatable)
        #[arg(long = "email")]
        emails: Vec<String>,
    },

    /// Run the reference approval service
    ApprovalServer {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Directory for the approval journal
        #[arg(long, value_name = "DIR")]
        journal_dir: Option<PathBuf>,
    },

    /// Validate configuration
    Validate {
        /// Configuration file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = AppConfig::load_or_default(&config_path, cli.config.is_some())?;
    config.apply_env_overrides();

    let mut logging = config.logging.to_config();
    if cli.verbose {
        logging.level = tracing::Level::DEBUG;
    }
    cw_observability::init_logging_with_config(logging);

    match cli.command {
        Commands::Contain {
            account,
            indicators,
            urls,
            emails,
        } => {
            let args = ContainArgs {
                account,
                indicators_file: indicators,
                urls,
                emails,
            };
            cmd_contain(config, args, cli.format).await
        }
        Commands::ApprovalServer {
            port,
            host,
            journal_dir,
        } => {
            let mut settings = config.approval_server;
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(host) = host {
                settings.host = host;
            }
            if journal_dir.is_some() {
                settings.journal_dir = journal_dir;
            }
            run_approval_server(settings).await
        }
        Commands::Validate { config: cfg_path } => {
            cmd_validate(cfg_path.unwrap_or(config_path)).await
        }
        Commands::Config { show_secrets } => cmd_config(config, show_secrets, cli.format).await,
    }
}

fn default_config_path() -> PathBuf {
    if let Some(dirs) =
        directories::ProjectDirs::from("com", "containment-warden", "containment-warden")
    {
        dirs.config_dir().join("config.yaml")
    } else {
        PathBuf::from("config/default.yaml")
    }
}

async fn cmd_contain(config: AppConfig, args: ContainArgs, format: OutputFormat) -> Result<()> {
    let report = run_contain(&config, args).await?;

    if format == OutputFormat::Text {
        print_report(&report);
        println!();
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn print_report(report: &ContainmentReport) {
    let results = match &report.results {
        Some(results) if report.approved => results,
        _ => {
            println!(
                "{} ({})",
                "Containment denied".red().bold(),
                report.reason.as_deref().unwrap_or("no reason given")
            );
            return;
        }
    };

    println!("{}", "Containment executed".green().bold());
    println!("─────────────────────");
    print_action("isolate", &results.isolate);
    print_action("reset_password", &results.reset_password);
    print_action("enforce_mfa", &results.enforce_mfa);
    for (domain, result) in &results.blocked_domains {
        print_action(&format!("block {}", domain), result);
    }
    print_action("quarantine", &results.quarantine);

    let failures = results.error_count();
    if failures > 0 {
        println!();
        println!(
            "{}",
            format!("{} action(s) failed; see the audit log", failures).yellow()
        );
    }
}

fn print_action(label: &str, result: &ActionResult) {
    if result.is_error() {
        let error = result
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error");
        println!("  {} {}: {}", "✗".red(), label, error);
    } else {
        println!("  {} {}: {}", "✓".green(), label, result.action);
    }
}

async fn cmd_validate(config_path: PathBuf) -> Result<()> {
    println!(
        "Validating configuration: {}",
        config_path.display().to_string().cyan()
    );

    let mut config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("{}: {:#}", "Configuration file error".red().bold(), e);
            std::process::exit(1);
        }
    };
    config.apply_env_overrides();

    let validation_result = ConfigValidator::validate(&config);
    validation_result.print();

    println!();
    println!("{}", "Configuration Summary".bold());
    println!("─────────────────────");
    println!("  Approval: {}", config.approval.effective_mode());
    println!("  Audit log: {}", config.audit.path.display());
    println!(
        "  Signed: {}",
        if config.audit.signing_key.is_some() {
            "yes"
        } else {
            "no"
        }
    );
    println!(
        "  Forwarding: {}",
        config.audit.forward_url.as_deref().unwrap_or("disabled")
    );

    if validation_result.has_errors() {
        println!();
        println!(
            "{}",
            "Configuration validation failed. Fix the errors above."
                .red()
                .bold()
        );
        std::process::exit(1);
    } else if validation_result.has_warnings() {
        println!();
        println!(
            "{}",
            "Configuration is valid with warnings. Review the warnings above."
                .yellow()
                .bold()
        );
    } else {
        println!();
        println!("{}", "Configuration is valid.".green().bold());
    }

    Ok(())
}

async fn cmd_config(config: AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let display_config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&display_config)?);
    } else {
        println!("{}", serde_yaml::to_string(&display_config)?);
    }

    Ok(())
}
