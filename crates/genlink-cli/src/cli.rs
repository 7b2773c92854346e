//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use genlink_core::{Capabilities, RunMode};

/// Environment variable whose presence forces a dry run
pub const DRY_RUN_ENV: &str = "DRY_RUN";

/// Environment variable whose presence stops after the conflict check
pub const CHECK_ONLY_ENV: &str = "CHECK_ONLY";

/// Switch the files of one system generation to the next
///
/// Reads the previous and next generation manifests, refuses to touch any
/// path it does not own, then creates, retargets, and removes links and
/// copies so the filesystem matches the next generation.
#[derive(Parser, Debug)]
#[command(name = "genlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Manifest of the currently active generation
    #[arg(value_name = "OLD_MANIFEST")]
    pub old_manifest: PathBuf,

    /// Manifest of the generation being activated
    #[arg(value_name = "NEW_MANIFEST")]
    pub new_manifest: PathBuf,

    /// Print the commands that would run without changing anything
    /// (also enabled by setting DRY_RUN)
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after the conflict check (also enabled by setting CHECK_ONLY)
    #[arg(long)]
    pub check_only: bool,

    /// Only manage symlinks; copy entries are reported, never placed
    #[arg(long)]
    pub link_only: bool,

    /// Output the activation report as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run mode from flags and the process environment.
    pub fn run_mode(&self) -> RunMode {
        self.run_mode_with(|name| std::env::var_os(name).is_some())
    }

    /// Run mode from flags, using `is_set` to test for environment
    /// variables. A variable counts when present, whatever its value.
    pub fn run_mode_with(&self, is_set: impl Fn(&str) -> bool) -> RunMode {
        RunMode {
            dry_run: self.dry_run || is_set(DRY_RUN_ENV),
            check_only: self.check_only || is_set(CHECK_ONLY_ENV),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        if self.link_only {
            Capabilities::link_only()
        } else {
            Capabilities::default()
        }
    }
}
