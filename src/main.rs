//! Probe binary.
//!
//! Runs the sequential probe over the compiled-in target list and prints
//! the summary. No flags, no configuration files; an interrupt aborts the
//! run immediately with a non-zero exit, while individual target failures
//! never affect the exit status.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use electrum_probe::{probe, report, target};

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let targets = target::builtin_targets();
    let config = probe::ProbeConfig::default();

    report::run_banner(&config.tx_hash, targets.len());

    tokio::select! {
        records = probe::run(&targets, &config) => {
            report::print_summary(&records);
            // Target failures are reported, not escalated.
            ExitCode::SUCCESS
        }
        _ = tokio::signal::ctrl_c() => {
            // Dropping the probe future drops any in-flight connection.
            report::interrupted();
            ExitCode::FAILURE
        }
    }
}
