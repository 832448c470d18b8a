//! CSV export
//!
//! Every field that does not parse as a number is quoted, which is what the
//! downstream notebooks expect from these files.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use super::Table;

fn write_table<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(writer);

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a table to `path`, creating parent directories
pub fn write_csv_file(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_table(table, file, delimiter).with_context(|| format!("Failed to write {}", path.display()))
}

/// Render a table as CSV text
pub fn write_csv_string(table: &Table, delimiter: u8) -> Result<String> {
    let mut buf = Vec::new();
    write_table(table, &mut buf, delimiter)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}
