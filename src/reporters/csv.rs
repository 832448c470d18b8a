//! CSV reporter: one `metric,value` row per metric

use super::MetricReport;
use crate::table::{write_csv_string, Table};
use anyhow::Result;

/// Render report as CSV with the given delimiter
pub fn render(report: &MetricReport, delimiter: u8) -> Result<String> {
    let table = Table::new(
        vec!["metric".to_string(), "value".to_string()],
        report
            .rows
            .iter()
            .map(|row| vec![row.label.to_string(), row.value.to_string()])
            .collect(),
    );
    write_csv_string(&table, delimiter)
}
