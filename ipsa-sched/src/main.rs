/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use ipsa_sched::config::WorkloadConfig;
use ipsa_sched::console::StdoutConsole;
use ipsa_sched::kernel::TokioKernel;
use ipsa_sched::workload;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Periodic producer / dispatcher workload on a bounded message queue.
///
/// Example:
///   ipsa-sched --config configs/workload.yaml --duration-secs 30
#[derive(Debug, Parser)]
#[command(
    name = "ipsa-sched",
    about = "Fixed-priority periodic workload – producers, hyperperiod timer, dispatcher",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML workload configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Stop after this many seconds instead of running until interrupted.
    #[arg(short = 'd', long = "duration-secs")]
    duration_secs: Option<u64>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialise structured logging.
    // RUST_LOG takes precedence over --log-level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    info!("ipsa-sched starting up...");

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!(
        config = ?cli.config,
        duration_secs = ?cli.duration_secs,
        "Configuration"
    );

    // ── Load workload configuration ───────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => WorkloadConfig::load_from_file(path)?,
        None => {
            warn!("No configuration file provided, using the built-in workload");
            WorkloadConfig::default()
        }
    };

    // ── Start the workload ────────────────────────────────────────────────────
    let kernel = TokioKernel::new();
    let running = workload::start(&config, kernel.clone(), Arc::new(StdoutConsole))
        .context("workload failed to start")?;

    // ── Run until the host stops us ───────────────────────────────────────────
    match cli.duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    info!(secs, "run duration elapsed");
                }
                res = tokio::signal::ctrl_c() => {
                    res.context("failed to listen for Ctrl-C")?;
                    info!("interrupted");
                }
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;
            info!("interrupted");
        }
    }

    kernel.shutdown().await;
    running.log_summary();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["ipsa-sched"]);
        assert!(cli.config.is_none());
        assert!(cli.duration_secs.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn cli_short_flags() {
        let cli = Cli::parse_from(["ipsa-sched", "-c", "w.yaml", "-d", "30"]);
        assert_eq!(cli.config, Some(PathBuf::from("w.yaml")));
        assert_eq!(cli.duration_secs, Some(30));
    }
}
