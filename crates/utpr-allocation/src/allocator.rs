//! Proportional allocation of residual top-up tax across entity records.
//!
//! Distributes `residual_top_up_tax` over a factor table using a convex
//! combination of each record's payroll share and tangible-asset share:
//!
//! weight = payroll_weight * (employees / total_employees)
//!        + asset_weight * (tangible_assets / total_assets)
//!
//! Allocations are rounded to 2 decimals and the rounding remainder is folded
//! into the last record in input order, so the allocated column sums exactly
//! to the input amount. The last record can therefore swing marginally
//! off-proportion on tables with many rows; exact summation is the hard
//! requirement here, not per-row fairness.

use crate::config::AllocationConfig;
use crate::error::{AllocationError, UtprResult};
use crate::table::{ASSETS_COLUMN, EMPLOYEES_COLUMN, EntityRecord, FactorTable};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utpr_types::FieldValue;

/// Output column name for the payroll factor share.
pub const PAYROLL_SHARE_COLUMN: &str = "Payroll_Share";
/// Output column name for the tangible-asset factor share.
pub const ASSET_SHARE_COLUMN: &str = "Asset_Share";
/// Output column name for the combined allocation weight.
pub const ALLOCATION_WEIGHT_COLUMN: &str = "Allocation_Weight";
/// Output column name for the allocated tax amount.
pub const ALLOCATED_TAX_COLUMN: &str = "Allocated_UTPR_Tax";

/// One entity record augmented with its allocation outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocatedEntity {
    /// The untouched source record.
    pub record: EntityRecord,
    /// employees / total_employees (0 when the total is 0).
    pub payroll_share: f64,
    /// tangible_assets / total_assets (0 when the total is 0).
    pub asset_share: f64,
    /// Convex combination of the two factor shares.
    pub allocation_weight: f64,
    /// Allocated tax, rounded to 2 decimals after reconciliation.
    pub allocated_tax: f64,
}

/// The source table extended with the four allocation columns, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationResult {
    columns: Vec<String>,
    entities: Vec<AllocatedEntity>,
}

impl AllocationResult {
    /// Column names: source columns followed by the four derived columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Augmented records in input order.
    pub fn entities(&self) -> &[AllocatedEntity] {
        &self.entities
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the result holds no records.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Sum of the allocated tax column.
    pub fn total_allocated(&self) -> f64 {
        self.entities.iter().map(|e| e.allocated_tax).sum()
    }
}

/// Stateless allocator for UTPR residual top-up tax.
#[derive(Debug, Default)]
pub struct Allocator;

impl Allocator {
    /// Create a new allocator.
    pub fn new() -> Self {
        Self
    }

    /// Run one allocation pass over `table` with `config`.
    ///
    /// Validation is fail-fast with a fixed check order so error reporting is
    /// deterministic: weights, tax amount, empty input, required columns,
    /// negative factors, weight/base consistency. Non-numeric factor cells are
    /// not an error; they coerce to 0 before the negative check runs.
    #[instrument(skip(self, table))]
    pub fn allocate(
        &self,
        table: &FactorTable,
        config: &AllocationConfig,
    ) -> UtprResult<AllocationResult> {
        if !config.weights_are_consistent() {
            return Err(AllocationError::InvalidWeights {
                payroll_weight: config.payroll_weight,
                asset_weight: config.asset_weight,
            });
        }

        if config.residual_top_up_tax < 0.0 {
            return Err(AllocationError::NegativeTaxAmount {
                amount: config.residual_top_up_tax,
            });
        }

        if table.is_empty() {
            return Err(AllocationError::EmptyInput);
        }

        let missing = table.missing_required_columns();
        if !missing.is_empty() {
            return Err(AllocationError::MissingColumns {
                columns: missing.into_iter().map(str::to_string).collect(),
            });
        }

        let employees = coerce_column(table, EMPLOYEES_COLUMN);
        let assets = coerce_column(table, ASSETS_COLUMN);

        check_non_negative(EMPLOYEES_COLUMN, &employees)?;
        check_non_negative(ASSETS_COLUMN, &assets)?;

        let total_employees: f64 = employees.iter().sum();
        let total_assets: f64 = assets.iter().sum();

        if total_employees == 0.0 && config.payroll_weight > 0.0 {
            return Err(AllocationError::InconsistentWeighting {
                factor: "payroll".to_string(),
            });
        }
        if total_assets == 0.0 && config.asset_weight > 0.0 {
            return Err(AllocationError::InconsistentWeighting {
                factor: "asset".to_string(),
            });
        }

        let mut entities: Vec<AllocatedEntity> = table
            .records()
            .iter()
            .zip(employees.iter().zip(assets.iter()))
            .map(|(record, (&employee_count, &asset_value))| {
                let payroll_share = if total_employees > 0.0 {
                    employee_count / total_employees
                } else {
                    0.0
                };
                let asset_share =
                    if total_assets > 0.0 { asset_value / total_assets } else { 0.0 };
                let allocation_weight = config.payroll_weight * payroll_share
                    + config.asset_weight * asset_share;

                AllocatedEntity {
                    record: record.clone(),
                    payroll_share,
                    asset_share,
                    allocation_weight,
                    allocated_tax: round2(allocation_weight * config.residual_top_up_tax),
                }
            })
            .collect();

        // Fold the rounding remainder into the last record so the allocated
        // column sums exactly to the input amount.
        let rounded_sum: f64 = entities.iter().map(|e| e.allocated_tax).sum();
        let remainder = config.residual_top_up_tax - rounded_sum;
        if let Some(last) = entities.last_mut() {
            last.allocated_tax = round2(last.allocated_tax + remainder);
        }

        info!(
            records = entities.len(),
            total_employees,
            total_assets,
            remainder,
            "Allocated residual top-up tax"
        );

        let mut columns: Vec<String> = table.columns().to_vec();
        columns.extend(
            [
                PAYROLL_SHARE_COLUMN,
                ASSET_SHARE_COLUMN,
                ALLOCATION_WEIGHT_COLUMN,
                ALLOCATED_TAX_COLUMN,
            ]
            .map(str::to_string),
        );

        Ok(AllocationResult { columns, entities })
    }
}

/// Coerce one factor column to `f64`, record by record.
///
/// Parse-or-default is deliberate tolerance for dirty source data: text that
/// does not parse as a number, empty cells, and non-finite values all become
/// 0. A negative numeric value survives coercion so the negative-value check
/// can reject it.
fn coerce_column(table: &FactorTable, column: &str) -> Vec<f64> {
    table
        .records()
        .iter()
        .map(|record| coerce_factor(record.get(column)))
        .collect()
}

fn coerce_factor(value: Option<&FieldValue>) -> f64 {
    let raw = match value {
        Some(v) => match v.as_f64() {
            Some(f) => f,
            None => match v {
                FieldValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
                _ => 0.0,
            },
        },
        None => 0.0,
    };
    if raw.is_finite() { raw } else { 0.0 }
}

fn check_non_negative(column: &str, values: &[f64]) -> UtprResult<()> {
    for (row, &value) in values.iter().enumerate() {
        if value < 0.0 {
            return Err(AllocationError::NegativeFactorValue {
                column: column.to_string(),
                row,
                value,
            });
        }
    }
    Ok(())
}

/// Round to 2 decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_factor_handles_dirty_cells() {
        assert_eq!(coerce_factor(Some(&FieldValue::Integer(5))), 5.0);
        assert_eq!(coerce_factor(Some(&FieldValue::Float(2.5))), 2.5);
        assert_eq!(
            coerce_factor(Some(&FieldValue::String(" 12.5 ".to_string()))),
            12.5
        );
        assert_eq!(coerce_factor(Some(&FieldValue::String("abc".to_string()))), 0.0);
        assert_eq!(coerce_factor(Some(&FieldValue::Null)), 0.0);
        assert_eq!(coerce_factor(None), 0.0);
        assert_eq!(coerce_factor(Some(&FieldValue::Float(f64::NAN))), 0.0);
    }

    #[test]
    fn coerce_factor_keeps_negative_numerics() {
        // Negatives must survive coercion so the validation step catches them.
        assert_eq!(coerce_factor(Some(&FieldValue::Integer(-5))), -5.0);
        assert_eq!(
            coerce_factor(Some(&FieldValue::String("-3.5".to_string()))),
            -3.5
        );
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(33.336), 33.34);
        assert_eq!(round2(250.004), 250.0);
        assert_eq!(round2(0.125), 0.13);
    }
}
