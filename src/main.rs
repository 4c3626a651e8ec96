//! partscan - interactive QR capture and inventory upload tool
//!
//! Menu-driven sessions over the capture-and-staging pipeline: scan codes
//! into the local stage, batch-upload staged parts, list remote part ids,
//! or wipe the remote inventory after an explicit typed confirmation.

use anyhow::Result;
use clap::Parser;
use partscan::capture::TerminalCapture;
use partscan::config::{Cli, Config};
use partscan::services::{LcscCatalog, PartsBoxClient};
use partscan::session::{ScanSession, SyncSession, UploadOutcome, UploadSession};
use partscan::staging::{IdentifierStage, RecordStage};
use std::io::Write;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level)?)
        .init();

    info!("Starting partscan");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(&cli)?;
    info!("Data directory: {}", config.data_dir.display());
    if config.api_key.is_empty() {
        warn!("No PartsBox API key configured; upload and sync sessions will fail");
    }

    let records = RecordStage::new(config.records_path());
    let identifiers = IdentifierStage::new(config.identifiers_path());
    let vendor = LcscCatalog::new(&config)?;
    let inventory = PartsBoxClient::new(&config)?;

    loop {
        println!();
        println!("1 - Scan QR codes into staging");
        println!("2 - Upload staged parts");
        println!("3 - List remote part ids");
        println!("4 - Delete all remote parts");
        println!("5 - Exit");
        let choice = prompt("Choice: ")?;

        // No session outcome is fatal; the menu always regains control.
        let result = match choice.as_str() {
            "1" => run_scan(&vendor, &records).await,
            "2" => run_upload(&inventory, &records).await,
            "3" => run_list(&inventory, &identifiers).await,
            "4" => run_delete(&inventory, &identifiers).await,
            "5" => break,
            _ => {
                println!("Invalid choice.");
                continue;
            }
        };
        if let Err(e) = result {
            warn!(error = %e, "Session failed");
            println!("Session failed: {}", e);
        }
    }

    Ok(())
}

async fn run_scan(vendor: &LcscCatalog, records: &RecordStage) -> Result<()> {
    let outcome = ScanSession::new(TerminalCapture::stdin(), vendor, records)
        .run()
        .await?;
    println!(
        "Scan session done: {} staged, {} rejected over {} frames.",
        outcome.confirmed, outcome.rejected, outcome.frames
    );
    Ok(())
}

async fn run_upload(inventory: &PartsBoxClient, records: &RecordStage) -> Result<()> {
    let report = UploadSession::new(inventory, records).run().await?;
    if report.total == 0 {
        println!("No staged parts to upload.");
        return Ok(());
    }

    for item in &report.items {
        let code = item.part_code.as_deref().unwrap_or("-");
        match &item.outcome {
            UploadOutcome::Created { part_id } => println!("  {} -> created {}", code, part_id),
            UploadOutcome::CreatedNoStock { part_id } => {
                println!("  {} -> created {} (stock NOT recorded)", code, part_id)
            }
            UploadOutcome::Failed { reason } => println!("  {} -> FAILED: {}", code, reason),
        }
    }
    println!(
        "Upload done: {}/{} parts created. Staging cleared.",
        report.succeeded, report.total
    );
    Ok(())
}

async fn run_list(inventory: &PartsBoxClient, identifiers: &IdentifierStage) -> Result<()> {
    let ids = SyncSession::new(inventory, identifiers).list_remote().await?;
    for id in &ids {
        println!("  {}", id);
    }
    println!("{} remote part ids staged for deletion.", ids.len());
    Ok(())
}

async fn run_delete(inventory: &PartsBoxClient, identifiers: &IdentifierStage) -> Result<()> {
    let answer = prompt("Type DELETE to remove every listed remote part: ")?;
    let report = SyncSession::new(inventory, identifiers)
        .delete_all(answer == "DELETE")
        .await?;
    if report.total == 0 {
        println!("Nothing deleted.");
        return Ok(());
    }

    for (id, status) in &report.items {
        println!("  {} -> {}", id, status);
    }
    println!("Delete done: {} parts processed.", report.total);
    Ok(())
}

/// Blocking menu prompt; a full barrier between sessions by design.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
