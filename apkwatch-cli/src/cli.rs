//! CLI argument parsing using clap derive API
//!
//! Purely declarative; no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// apkwatch -- privacy-risk scoring for Android package identifiers.
///
/// Use `apkwatch <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "apkwatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to the apkwatch.toml configuration file.
    #[arg(short, long, global = true, default_value = "apkwatch.toml")]
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one package identifier locally.
    Scan(ScanArgs),

    /// Show the latest-threats feed.
    Feed(FeedArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Compute the risk assessment for a package identifier.
///
/// Runs entirely in-process; nothing is broadcast to stream clients.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Package identifier, e.g. com.chatwave.secure
    pub identifier: String,
}

// ---- feed ----

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Number of entries (default: feed.default_limit from config).
    #[arg(short, long)]
    pub limit: Option<usize>,
}

// ---- config ----

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
        /// Only this section (general, server, stream, feed, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}
