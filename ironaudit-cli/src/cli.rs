//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// ironaudit -- audits workload manifests for weakened container isolation.
///
/// Use `ironaudit <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "ironaudit", version, about, long_about = None)]
pub struct Cli {
    /// Path to the ironaudit.toml configuration file (optional; defaults apply if missing).
    #[arg(short, long, default_value = "ironaudit.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit containers that mount /var/run/docker.sock.
    ///
    /// A container passes when it does not mount /var/run/docker.sock.
    /// A WARN is reported for every mount of /var/run/docker.sock; setting the
    /// `allow-mount-docker-sock` label on the resource reports it as allowed,
    /// with the label value as the reason.
    Mountds(MountdsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- mountds ----

/// Audit manifests for docker socket mounts.
#[derive(Args, Debug)]
pub struct MountdsArgs {
    /// Manifest file(s) to audit (multi-document YAML).
    #[arg(short = 'f', long = "manifest", required = true, num_args = 1..)]
    pub manifests: Vec<PathBuf>,
}

// ---- config ----

/// Manage ironaudit configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, audit).
        #[arg(long)]
        section: Option<String>,
    },
}
