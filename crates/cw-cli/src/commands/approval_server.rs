//! Approval-server command - runs the reference approval service.

use anyhow::{Context, Result};
use colored::Colorize;
use cw_api::{ApprovalServer, ApprovalServerConfig};
use std::net::SocketAddr;

use crate::config::ApprovalServerSettings;

pub async fn run_approval_server(settings: ApprovalServerSettings) -> Result<()> {
    let bind_address: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .context("Invalid bind address")?;

    println!("{} Starting approval service...", "[approvals]".cyan());
    println!("  {} Listening on http://{}", "→".green(), bind_address);
    println!("  {} Submit:   POST /request", "→".green());
    println!("  {} Status:   GET  /status/{{id}}", "→".green());
    println!("  {} Callback: POST /callback/{{id}}", "→".green());
    match &settings.journal_dir {
        Some(dir) => println!("  {} Journal: {}", "→".green(), dir.display()),
        None => println!("  {} Journal: disabled", "→".yellow()),
    }
    println!();

    ApprovalServer::new(ApprovalServerConfig {
        bind_address,
        journal_dir: settings.journal_dir,
    })
    .run()
    .await
    .context("Approval server failed")?;

    println!("{}", "Approval service stopped".green());
    Ok(())
}
