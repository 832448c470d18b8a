//! JSON reporter
//!
//! Outputs a report as a flat, ordered object of metric values.

use super::MetricReport;
use anyhow::Result;
use serde_json::{Map, Value};

fn to_value(report: &MetricReport) -> Result<Value> {
    let mut object = Map::new();
    for row in &report.rows {
        object.insert(row.key.to_string(), serde_json::to_value(row.value)?);
    }
    Ok(Value::Object(object))
}

/// Render report as JSON
pub fn render(report: &MetricReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_value(report)?)?)
}
