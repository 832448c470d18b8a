//! Text (terminal) reporter with colors and formatting

use super::{MetricReport, MetricValue};
use anyhow::Result;
use console::style;

/// Render report as formatted terminal output
pub fn render(report: &MetricReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", style(&report.title).bold()));
    out.push_str(&format!(
        "{}\n",
        style("──────────────────────────────────────").dim()
    ));

    let width = report
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0);

    for row in &report.rows {
        let value = match row.value {
            MetricValue::Count(n) => style(n.to_string()).bold(),
            MetricValue::Score(v) => style(format!("{v:.4}")).cyan(),
        };
        out.push_str(&format!("  {:<width$}  {}\n", row.label, value));
    }

    Ok(out)
}
