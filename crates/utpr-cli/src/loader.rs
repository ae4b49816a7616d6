//! CSV loader for UTPR factor tables.
//!
//! Headers become the table's column list in file order. Cells get the
//! narrowest numeric type they parse as; everything else stays text so the
//! core's coercion step decides what to do with dirty data. No validation
//! happens here.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;
use utpr_allocation::{EntityRecord, FactorTable};
use utpr_types::FieldValue;

/// Load a factor table from a CSV file on disk.
pub fn load_factor_table(path: &Path) -> Result<FactorTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file '{}'", path.display()))?;
    let table = parse_factor_table(file)
        .with_context(|| format!("Failed to parse '{}'", path.display()))?;
    info!(
        records = table.len(),
        columns = table.columns().len(),
        path = %path.display(),
        "Loaded factor table"
    );
    Ok(table)
}

/// Parse a factor table from any CSV reader.
pub fn parse_factor_table<R: Read>(reader: R) -> Result<FactorTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let columns: Vec<String> =
        csv_reader.headers().context("Failed to read CSV header row")?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.context("Failed to read CSV record")?;
        let mut record = EntityRecord::new();
        for (column, cell) in columns.iter().zip(row.iter()) {
            record.fields.insert(column.clone(), parse_cell(cell));
        }
        records.push(record);
    }

    Ok(FactorTable::new(columns, records))
}

fn parse_cell(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return FieldValue::Float(f);
    }
    FieldValue::String(raw.to_string())
}
