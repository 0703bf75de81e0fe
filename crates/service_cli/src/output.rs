//! Report rendering shared by every driver.

use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// Settings every driver receives.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    /// Output format
    pub output: OutputFormat,
    /// Seed for random drivers
    pub seed: u64,
}

/// A driver result printable as text or JSON.
pub trait Report: Serialize {
    /// Banner printed above the text rendering.
    fn title(&self) -> String;

    /// Text body.
    fn print_text(&self);
}

/// Prints `report` in the configured format.
pub fn emit<R: Report>(report: &R, ctx: &RunContext) -> Result<()> {
    match ctx.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            println!("========================================");
            println!("{}", report.title());
            println!("========================================");
            report.print_text();
        }
    }
    Ok(())
}

/// Formats a float with `digits` decimals, or in scientific notation when
/// it would print as zero or wider than the column.
pub fn fmt_num(value: f64, digits: usize) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && (magnitude < 10f64.powi(-(digits as i32)) || magnitude >= 1e9) {
        format!("{value:.digits$e}")
    } else {
        format!("{value:.digits$}")
    }
}
