//! Command-line interface definitions for ufs-dtcheck.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Checks UFS platform device descriptions against the probe sequence.
#[derive(Parser)]
#[command(name = "ufs-dtcheck", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Probe a board description with dry-run collaborators.
    Probe(ProbeArgs),
    /// Print the regulator role table.
    Roles,
}

/// Arguments for the `probe` subcommand.
#[derive(Parser)]
pub struct ProbeArgs {
    /// Board description (TOML).
    pub board: PathBuf,

    /// Make controller initialization fail with this errno.
    #[arg(long, value_name = "ERRNO", allow_hyphen_values = true)]
    pub fail_init: Option<i32>,

    /// Vendor variant name to attach to the adapter.
    #[arg(long)]
    pub variant: Option<String>,
}
