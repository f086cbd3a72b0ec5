//! `apkwatch scan` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use apkwatch_core::types::{RiskLevel, RiskPayload};
use apkwatch_risk_engine::compute_risk;

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
pub fn execute(args: ScanArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let report = ScanReport(compute_risk(&args.identifier));
    info!(
        package = %report.0.package,
        score = report.0.risk_score,
        level = %report.0.risk_level,
        "local scan complete"
    );
    writer.render(&report)
}

/// A single risk assessment; serializes exactly like the HTTP scan response.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ScanReport(pub RiskPayload);

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let p = &self.0;
        writeln!(w, "{} ({})", p.app_name.bold(), p.package)?;
        writeln!(
            w,
            "  Risk:    {} [{}]",
            p.risk_score_text,
            paint_level(p.risk_level, &p.risk_level.to_string())
        )?;
        writeln!(w, "  Verdict: {}", p.verdict)?;
        writeln!(w)?;

        writeln!(w, "Dangerous permissions ({}):", p.permissions.dangerous.len())?;
        for finding in &p.permissions.dangerous {
            writeln!(w, "  {} {}", "!".red(), finding.name)?;
            writeln!(w, "      {}", finding.reason)?;
        }
        if !p.permissions.normal.is_empty() {
            writeln!(w, "Normal permissions ({}):", p.permissions.normal.len())?;
            for finding in &p.permissions.normal {
                writeln!(w, "    {}", finding.name)?;
            }
        }
        writeln!(w)?;

        let flow: Vec<&str> = p.threat_flow.iter().map(|n| n.label.as_str()).collect();
        writeln!(w, "Threat flow: {}", flow.join(" -> "))?;
        writeln!(w)?;

        writeln!(w, "Recommended actions:")?;
        for (i, action) in p.actions.iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, action)?;
        }
        writeln!(w)?;
        writeln!(w, "{}", p.usage_advice.italic())?;

        Ok(())
    }
}

/// Colors `text` by severity band.
pub(crate) fn paint_level(level: RiskLevel, text: &str) -> colored::ColoredString {
    use colored::Colorize;

    match level {
        RiskLevel::Critical => text.red().bold(),
        RiskLevel::Elevated => text.yellow(),
        RiskLevel::Guarded => text.green(),
    }
}
