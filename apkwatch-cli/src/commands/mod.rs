//! Command handlers -- one module per subcommand

pub mod config;
pub mod feed;
pub mod scan;

use std::path::Path;

use apkwatch_core::config::ApkwatchConfig;
use apkwatch_core::error::{ApkwatchError, ConfigError};
use tracing::debug;

/// Label used as the config source when no file exists.
pub const BUILTIN_DEFAULTS: &str = "(built-in defaults)";

/// Loads the effective configuration for commands that can run without a
/// config file. A missing file yields defaults plus environment overrides.
///
/// Returns the configuration and a label describing where it came from.
pub async fn load_or_default(path: &Path) -> Result<(ApkwatchConfig, String), ApkwatchError> {
    match ApkwatchConfig::load(path).await {
        Ok(config) => Ok((config, path.display().to_string())),
        Err(ApkwatchError::Config(ConfigError::FileNotFound { .. })) => {
            debug!(path = %path.display(), "config file not found, using defaults");
            let mut config = ApkwatchConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok((config, BUILTIN_DEFAULTS.to_owned()))
        }
        Err(e) => Err(e),
    }
}
