use std::path::Path;

use anyhow::Result;
use clap::Parser;

use apkwatch_core::config::ApkwatchConfig;
use apkwatch_core::error::{ApkwatchError, ConfigError};
use apkwatch_daemon::cli::DaemonCli;
use apkwatch_daemon::logging;
use apkwatch_daemon::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let (mut config, missing_file) = load_config(&cli.config).await?;
    apply_cli_overrides(&mut config, &cli);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    if cli.validate {
        print!("{}", validation_report(&config, &cli.config, missing_file)?);
        return Ok(());
    }

    logging::init_tracing(&config.general)?;

    if missing_file {
        tracing::warn!(
            path = %cli.config.display(),
            "config file not found, using built-in defaults"
        );
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_addr = %config.server.listen_addr,
        port = config.server.port,
        "apkwatch-daemon starting"
    );

    let mut orchestrator = Orchestrator::build_from_config(config).await?;
    orchestrator.run().await
}

/// Loads the config file; a missing file yields defaults plus environment
/// overrides. The flag reports whether the fallback was taken.
async fn load_config(path: &Path) -> Result<(ApkwatchConfig, bool)> {
    match ApkwatchConfig::load(path).await {
        Ok(config) => Ok((config, false)),
        Err(ApkwatchError::Config(ConfigError::FileNotFound { .. })) => {
            let mut config = ApkwatchConfig::default();
            config.apply_env_overrides();
            Ok((config, true))
        }
        Err(e) => Err(anyhow::anyhow!("failed to load config: {}", e)),
    }
}

/// `--validate` output: the source line followed by the resolved
/// configuration (defaults, file, environment, flags) as TOML.
fn validation_report(config: &ApkwatchConfig, path: &Path, missing_file: bool) -> Result<String> {
    let source = if missing_file {
        format!("{} (not found, built-in defaults)", path.display())
    } else {
        path.display().to_string()
    };
    let body = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("failed to serialize configuration: {}", e))?;
    Ok(format!("# configuration is valid: {source}\n{body}"))
}

fn apply_cli_overrides(config: &mut ApkwatchConfig, cli: &DaemonCli) {
    if let Some(level) = &cli.log_level {
        config.general.log_level.clone_from(level);
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format.clone_from(format);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(pid_file) = &cli.pid_file {
        config.general.pid_file.clone_from(pid_file);
    }
}
