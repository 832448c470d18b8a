//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Renders a two-column table; counts and scores are separated by a
//! divider row.

use super::{MetricReport, MetricValue};
use anyhow::Result;

/// Render report as a Markdown table
pub fn render(report: &MetricReport) -> Result<String> {
    let mut md = String::new();
    md.push_str(&format!("## {}\n\n", report.title));
    md.push_str("|Metric|Value|\n|-|-|\n");

    let mut previous: Option<&MetricValue> = None;
    for row in &report.rows {
        let switched = matches!(
            (previous, &row.value),
            (Some(MetricValue::Count(_)), MetricValue::Score(_))
        );
        if switched {
            md.push_str("|-|-|\n");
        }
        md.push_str(&format!("|{}|{}|\n", row.label, row.value));
        previous = Some(&row.value);
    }

    Ok(md)
}
