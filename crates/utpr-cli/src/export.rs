//! Exporters for allocation results.
//!
//! Each exporter renders the extended table: source columns first, then
//! `Payroll_Share`, `Asset_Share`, `Allocation_Weight`, `Allocated_UTPR_Tax`.
//! Those four names are the external contract downstream tooling matches.

use anyhow::{Context, Result, anyhow};
use csv::Writer;
use utpr_allocation::{
    ALLOCATED_TAX_COLUMN, ALLOCATION_WEIGHT_COLUMN, ASSET_SHARE_COLUMN, AllocatedEntity,
    AllocationResult, PAYROLL_SHARE_COLUMN,
};

/// Number of derived columns appended to the source columns.
const DERIVED_COLUMNS: usize = 4;

fn source_columns(result: &AllocationResult) -> &[String] {
    let columns = result.columns();
    &columns[..columns.len() - DERIVED_COLUMNS]
}

fn row_cells(entity: &AllocatedEntity, source: &[String]) -> Vec<String> {
    let mut cells: Vec<String> = source
        .iter()
        .map(|column| entity.record.get(column).map(ToString::to_string).unwrap_or_default())
        .collect();
    cells.push(entity.payroll_share.to_string());
    cells.push(entity.asset_share.to_string());
    cells.push(entity.allocation_weight.to_string());
    cells.push(format!("{:.2}", entity.allocated_tax));
    cells
}

/// Renders an allocation result as CSV text.
pub struct CsvExporter;

impl CsvExporter {
    /// Create a new CSV exporter.
    pub fn new() -> Self {
        Self
    }

    /// Export the full extended table, header row first.
    pub fn export(&self, result: &AllocationResult) -> Result<String> {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(result.columns())?;

        let source = source_columns(result);
        for entity in result.entities() {
            wtr.write_record(row_cells(entity, source))?;
        }

        let data = wtr.into_inner().map_err(|e| anyhow!("CSV writer error: {}", e))?;
        String::from_utf8(data).context("CSV output was not valid UTF-8")
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an allocation result as a JSON array of objects.
pub struct JsonExporter;

impl JsonExporter {
    /// Create a new JSON exporter.
    pub fn new() -> Self {
        Self
    }

    /// Export one object per record: source fields plus the derived fields.
    pub fn export(&self, result: &AllocationResult) -> Result<String> {
        let source = source_columns(result);
        let rows: Vec<serde_json::Value> = result
            .entities()
            .iter()
            .map(|entity| {
                let mut object = serde_json::Map::new();
                for column in source {
                    let cell = entity
                        .record
                        .get(column)
                        .map_or(serde_json::Value::Null, Into::into);
                    object.insert(column.clone(), cell);
                }
                object.insert(PAYROLL_SHARE_COLUMN.to_string(), json_number(entity.payroll_share));
                object.insert(ASSET_SHARE_COLUMN.to_string(), json_number(entity.asset_share));
                object.insert(
                    ALLOCATION_WEIGHT_COLUMN.to_string(),
                    json_number(entity.allocation_weight),
                );
                object.insert(ALLOCATED_TAX_COLUMN.to_string(), json_number(entity.allocated_tax));
                serde_json::Value::Object(object)
            })
            .collect();

        serde_json::to_string_pretty(&rows).context("Failed to serialize allocation result")
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn json_number(value: f64) -> serde_json::Value {
    serde_json::Number::from_f64(value).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

/// Renders an allocation result as an aligned text table with a total line.
pub fn render_table(result: &AllocationResult) -> String {
    let source = source_columns(result);
    let header: Vec<String> = result.columns().to_vec();
    let rows: Vec<Vec<String>> =
        result.entities().iter().map(|entity| row_cells(entity, source)).collect();

    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    render_row(&mut out, &header, &widths);
    for row in &rows {
        render_row(&mut out, row, &widths);
    }
    out.push_str(&format!(
        "Total {}: {:.2}\n",
        ALLOCATED_TAX_COLUMN,
        result.total_allocated()
    ));
    out
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let rendered: Vec<String> = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect();
    out.push_str(&rendered.join("  "));
    out.push('\n');
}
