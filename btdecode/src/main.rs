//! # btdecode - Main Entry Point
//!
//! Reads a panic transcript from stdin and writes it back with every stack
//! frame (and, in kernel mode, the page fault) resolved to
//! `region+offset` / `function+offset`.
//!
//! Terminal echo is off while reading so a pasted transcript is not printed
//! twice. Ctrl+C ends the session with exit code 130 after echo is restored.

use anyhow::{Context, Result};
use btdecode::cli::Args;
use btdecode::config::DecoderConfig;
use btdecode::export::ResolutionReport;
use btdecode::preflight::run_preflight_checks;
use btdecode::session::{run_guarded, SessionOutcome};
use btdecode::terminal::TermiosEcho;
use clap::Parser;
use log::warn;
use std::fs::File;
use std::io::BufWriter;
use tokio::io::BufReader;

// Exit codes
const EXIT_ERROR: i32 = 1;

fn main() {
    env_logger::init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };
    let result = runtime.block_on(run());
    // A pending stdin read sits on a blocking thread and cannot be cancelled
    runtime.shutdown_background();

    std::process::exit(match result {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

/// Resolves once SIGINT arrives; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn run() -> Result<SessionOutcome> {
    let args = Args::parse();
    let quiet = args.quiet;

    let config = DecoderConfig::from_args(&args);
    run_preflight_checks(&config)?;

    if !quiet {
        eprintln!("btdecode v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("mode: {:?}", config.mode);
        eprintln!("binaries: {}", config.bin_dir.display());
        eprintln!("paste the transcript, end with Ctrl+D");
    }

    let mut decoder = config.decoder().context("Failed to load kernel symbols")?;

    let mut stdout = std::io::stdout();
    let outcome = run_guarded(
        TermiosEcho::stdin(),
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        &mut decoder,
        interrupted(),
    )
    .await
    .context("Decoding failed")?;

    if outcome == SessionOutcome::Interrupted && !quiet {
        eprintln!("\ninterrupted");
    }

    if let Some(ref report_path) = config.report {
        let report = ResolutionReport::from_decoder(&decoder);
        let file = File::create(report_path)
            .context("Failed to create report file")?;
        report
            .export(BufWriter::new(file))
            .context("Failed to export report")?;

        if !quiet {
            eprintln!(
                "saved: {} ({} frames)",
                report_path.display(),
                report.frame_count()
            );
        }
    }

    Ok(outcome)
}
