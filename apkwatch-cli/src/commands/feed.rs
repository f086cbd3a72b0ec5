//! `apkwatch feed` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use apkwatch_risk_engine::{ThreatFeed, build_feed};

use crate::cli::FeedArgs;
use crate::commands::load_or_default;
use crate::commands::scan::paint_level;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, truncate};

const SUMMARY_WIDTH: usize = 48;

/// Execute the `feed` command.
pub async fn execute(
    args: FeedArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let (config, source) = load_or_default(config_path).await?;
    let limit = args.limit.unwrap_or(config.feed.default_limit);

    info!(source = %source, limit, "building threat feed");
    let report = FeedReport(build_feed(&config.feed.identifiers, limit));
    writer.render(&report)
}

/// Serializes exactly like the HTTP feed response.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct FeedReport(pub ThreatFeed);

impl Render for FeedReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let items = &self.0.items;
        writeln!(
            w,
            "Latest threats ({}), generated {}",
            items.len(),
            self.0.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if items.is_empty() {
            writeln!(w, "{}", "No entries.".dimmed())?;
            return Ok(());
        }

        writeln!(w)?;
        writeln!(
            w,
            "{:<28} {:<10} {:>5}  Summary",
            "Package", "Level", "Score"
        )?;
        writeln!(w, "{}", "-".repeat(96))?;
        for item in items {
            // pad before coloring; escape codes would skew the column
            let level = format!("{:<10}", item.risk_level.to_string());
            writeln!(
                w,
                "{:<28} {} {:>5}  {}",
                truncate(&item.package, 28),
                paint_level(item.risk_level, &level),
                item.risk_score,
                truncate(&item.summary, SUMMARY_WIDTH)
            )?;
        }
        Ok(())
    }
}
