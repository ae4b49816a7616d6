//! In-memory factor table consumed by the allocator.
//!
//! The table is an ordered sequence of entity records plus the ordered column
//! list the source exposed. Column order belongs to the table; each record
//! stores its cells as a field map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utpr_types::FieldValue;

/// Contract name of the payroll factor column.
pub const EMPLOYEES_COLUMN: &str = "Employees";
/// Contract name of the tangible-asset factor column.
pub const ASSETS_COLUMN: &str = "Tangible_Assets";

/// A single constituent entity row from the source table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntityRecord {
    /// Source cells keyed by column name.
    pub fields: HashMap<String, FieldValue>,
}

impl EntityRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a cell by column name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Ordered table of entity records with the source column list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorTable {
    columns: Vec<String>,
    records: Vec<EntityRecord>,
}

impl FactorTable {
    /// Create a table from a column list and records in source order.
    pub fn new(columns: Vec<String>, records: Vec<EntityRecord>) -> Self {
        Self { columns, records }
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in source order.
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Required factor columns absent from this table, in contract order.
    pub fn missing_required_columns(&self) -> Vec<&'static str> {
        [EMPLOYEES_COLUMN, ASSETS_COLUMN]
            .into_iter()
            .filter(|required| !self.columns.iter().any(|c| c == required))
            .collect()
    }
}
