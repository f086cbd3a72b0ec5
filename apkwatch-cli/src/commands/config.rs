//! `apkwatch config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use apkwatch_core::config::ApkwatchConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::load_or_default;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Section names accepted by `config show --section`.
pub const SECTIONS: [&str; 5] = ["general", "server", "stream", "feed", "metrics"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Loads and validates the file; a missing file counts as invalid.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let errors = match ApkwatchConfig::load(config_path).await {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    };
    let report = ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        errors,
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

/// Shows the effective configuration (file + env overrides + defaults).
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let (config, source) = load_or_default(config_path).await?;
    info!(source = %source, "showing configuration");

    let report = match section {
        Some(name) => ConfigReport {
            config_toml: section_toml(&config, &name)?,
            source,
            section: Some(name),
        },
        None => ConfigReport {
            config_toml: to_toml(&config)?,
            source,
            section: None,
        },
    };

    writer.render(&report)
}

fn section_toml(config: &ApkwatchConfig, name: &str) -> Result<String, CliError> {
    match name {
        "general" => to_toml(&config.general),
        "server" => to_toml(&config.server),
        "stream" => to_toml(&config.stream),
        "feed" => to_toml(&config.feed),
        "metrics" => to_toml(&config.metrics),
        _ => Err(CliError::Command(format!(
            "unknown section: {} (expected: {})",
            name,
            SECTIONS.join(", ")
        ))),
    }
}

fn to_toml<T: Serialize>(value: &T) -> Result<String, CliError> {
    toml::to_string_pretty(value)
        .map_err(|e| CliError::Command(format!("failed to serialize configuration: {e}")))
}

/// Effective configuration, rendered as TOML in text mode.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path, or a marker for built-in defaults
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Only used for text rendering
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.section {
            Some(section) => writeln!(
                w,
                "Configuration {} (source: {})",
                format!("[{section}]").bold(),
                self.source
            )?,
            None => writeln!(w, "Configuration (source: {})", self.source.bold())?,
        }
        writeln!(w)?;
        write!(w, "{}", self.config_toml)
    }
}

/// Result of `config validate`.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Empty when valid
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;
        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}
