//! genlink CLI
//!
//! Switches the managed files of a system from one generation manifest to
//! the next.

mod cli;
mod error;
mod output;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use genlink_core::{ActivationStatus, activate_files};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::{CliError, Result};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose` when set.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let mode = cli.run_mode();
    let capabilities = cli.capabilities();
    tracing::debug!(?mode, ?capabilities, "Starting activation");

    let report = activate_files(&cli.old_manifest, &cli.new_manifest, mode, capabilities)?;

    let mut stdout = io::stdout().lock();
    if cli.json {
        output::render_json(&report, &mut stdout)?;
    } else {
        output::render(&report, &mut stdout)?;
    }

    if report.status == ActivationStatus::Conflicted {
        return Err(CliError::Conflicts {
            count: report.problems.len(),
        });
    }
    Ok(())
}
