//! CLI argument definitions for apkwatch-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// apkwatch privacy-risk scanning daemon.
///
/// Serves the scan endpoint, streams scan results to connected clients
/// and exposes the latest-threats feed.
#[derive(Parser, Debug)]
#[command(name = "apkwatch-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to apkwatch.toml configuration file.
    ///
    /// A missing file at the default location falls back to built-in defaults.
    #[arg(short, long, default_value = "/etc/apkwatch/apkwatch.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,

    /// Override PID file path (takes precedence over config file).
    #[arg(long)]
    pub pid_file: Option<String>,
}
