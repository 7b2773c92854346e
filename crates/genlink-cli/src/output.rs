//! Rendering activation reports for the terminal
//!
//! Problem lines, dry-run commands, and skipped-transaction notices are
//! printed plain so scripts can consume them. Summaries are colored.

use std::io::{self, Write};

use colored::Colorize;
use genlink_core::{ActivationReport, ActivationStatus};

/// Write the human-readable form of `report` to `out`.
pub fn render(report: &ActivationReport, out: &mut impl Write) -> io::Result<()> {
    match report.status {
        ActivationStatus::Conflicted => {
            for problem in &report.problems {
                writeln!(out, "{problem}")?;
            }
            writeln!(out, "Aborting")?;
        }
        ActivationStatus::Checked => {
            writeln!(out, "{} No conflicts found.", "OK".green().bold())?;
        }
        ActivationStatus::DryRun | ActivationStatus::Applied => {
            let Some(execution) = &report.execution else {
                return Ok(());
            };

            for command in &execution.commands {
                writeln!(out, "{command}")?;
            }
            for skipped in &execution.skipped {
                writeln!(out, "{}", skipped.reason)?;
            }

            if report.status == ActivationStatus::Applied {
                if execution.applied.is_empty() {
                    writeln!(out, "{} Already up to date.", "OK".green().bold())?;
                } else {
                    writeln!(
                        out,
                        "{} Applied {} transaction(s).",
                        "OK".green().bold(),
                        execution.applied.len()
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// Write `report` as pretty JSON to `out`.
pub fn render_json(report: &ActivationReport, out: &mut impl Write) -> crate::error::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
