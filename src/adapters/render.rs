//! Plain-text renderings of measurements and stored reports: bar chart,
//! printable report and history table. Nothing here feeds back into
//! classification or storage.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::models::{Measurement, Parameter, Report};
use crate::quality::classifier::Assessment;

/// Width in characters of the longest bar.
pub const CHART_WIDTH: usize = 40;

fn label_with_unit(p: Parameter) -> String {
    match p.unit() {
        "" => p.label().to_string(),
        unit => format!("{} ({})", p.label(), unit),
    }
}

fn value_with_unit(p: Parameter, v: f64) -> String {
    match p.unit() {
        "" => format!("{v}"),
        unit => format!("{v} {unit}"),
    }
}

/// Horizontal bar chart of the nine raw readings.
///
/// Bars are scaled to the largest absolute reading. Values are shown
/// unchanged next to each bar.
pub fn render_bar_chart(m: &Measurement) -> String {
    let values = m.values();
    let peak = values.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
    let label_width = values
        .iter()
        .map(|(p, _)| label_with_unit(*p).chars().count())
        .max()
        .unwrap_or(0);

    let bar_width = CHART_WIDTH;
    let mut out = String::from("Water Test Parameters\n");
    for (p, v) in values {
        let len = if peak > 0.0 {
            ((v.abs() / peak) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<label_width$} | {:<bar_width$} {}",
            label_with_unit(p),
            "#".repeat(len.min(CHART_WIDTH)),
            v
        );
    }
    out
}

/// Printable report for one submission.
pub fn render_report(m: &Measurement, assessment: &Assessment, timestamp: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Water Quality Report");
    let _ = writeln!(out, "====================");
    let _ = writeln!(out, "Date: {timestamp}");
    let _ = writeln!(out);
    for (p, v) in m.values() {
        let _ = writeln!(out, "{}: {}", p.label(), value_with_unit(p, v));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Water Status: {}", assessment.verdict);
    if !assessment.flagged.is_empty() {
        let names: Vec<&str> = assessment.flagged.iter().map(|p| p.label()).collect();
        let _ = writeln!(out, "Out of range: {}", names.join(", "));
    }
    out
}

/// File name suggested when the user does not pick one.
pub fn default_report_file_name(at: &DateTime<Local>) -> String {
    format!("Water_Report_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

/// Fixed-width table of stored reports, in the order given.
pub fn render_history(reports: &[Report]) -> String {
    if reports.is_empty() {
        return String::from("No reports stored yet.\n");
    }

    let mut out = String::new();
    let _ = write!(out, "{:>5}  {:<19}", "Id", "Date");
    for p in Parameter::ALL {
        let _ = write!(out, "  {:>12}", p.label());
    }
    let _ = writeln!(out, "  Status");

    for r in reports {
        let _ = write!(out, "{:>5}  {:<19}", r.id, r.date);
        for (_, v) in r.measurement.values() {
            let _ = write!(out, "  {:>12}", v);
        }
        let _ = writeln!(out, "  {}", r.verdict);
    }
    out
}
