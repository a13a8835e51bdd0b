//! logsweep - age-based log-retention daemon.
//!
//! Enforce a retention policy against a directory tree on a fixed,
//! epoch-aligned cadence.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use logsweep::cli::Cli;
use logsweep::clock::{Clock, SystemClock};
use logsweep::daemon::Daemon;
use logsweep::sweep;
use logsweep::{Result, SweepError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot {
                // Robot mode: JSON error output to stdout
                let code = match &e {
                    SweepError::Config(_) => "config_error",
                    SweepError::RootUnreachable { .. } => "root_unreachable",
                    SweepError::Io(_) => "io_error",
                };
                let error_json = serde_json::json!({
                    "error": true,
                    "code": code,
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let policy = cli.policy()?;
    policy.validate_root()?;

    if cli.once {
        let report = sweep::sweep_once(
            &policy,
            SystemClock.now(),
            cli.dry_run,
            &AtomicBool::new(false),
        )?;
        if cli.robot {
            println!("{}", serde_json::to_string(&report).unwrap_or_default());
        } else {
            let verb = if cli.dry_run { "would delete" } else { "deleted" };
            println!(
                "{verb} {} file(s), {} error(s), {} scanned",
                report.deleted, report.errors, report.scanned
            );
        }
        return Ok(());
    }

    let daemon = Daemon::new(policy, cli.interval_secs, cli.dry_run, Arc::new(SystemClock));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(daemon.run())
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,logsweep=info",
        1 => "info,logsweep=debug",
        2 => "debug,logsweep=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
