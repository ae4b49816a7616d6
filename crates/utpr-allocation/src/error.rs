//! Structured error handling for the UTPR allocation engine
//!
//! Every validation failure aborts the whole computation before any allocation
//! is produced. The variants are distinct so a caller can branch on cause.

use thiserror::Error;

/// Error type for allocation operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// Factor weights do not sum to 1 within tolerance.
    #[error(
        "Payroll and asset weights must sum to 1 (got payroll={payroll_weight}, asset={asset_weight})"
    )]
    InvalidWeights {
        payroll_weight: f64,
        asset_weight: f64,
    },

    /// The residual top-up tax amount to allocate is negative.
    #[error("Residual top-up tax must be non-negative (got {amount})")]
    NegativeTaxAmount { amount: f64 },

    /// The source table has zero records.
    #[error("Input table contains no data")]
    EmptyInput,

    /// One or more required factor columns are absent from the source table.
    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// A coerced factor value is negative.
    #[error("Column '{column}' has negative value {value} at row {row}")]
    NegativeFactorValue {
        column: String,
        row: usize,
        value: f64,
    },

    /// A positive factor weight has no corresponding non-zero factor base.
    #[error("{factor} weight is positive but the {factor} factor totals zero")]
    InconsistentWeighting { factor: String },
}

impl AllocationError {
    /// Get the error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            AllocationError::InvalidWeights { .. } => "invalid_weights",
            AllocationError::NegativeTaxAmount { .. } => "negative_tax_amount",
            AllocationError::EmptyInput => "empty_input",
            AllocationError::MissingColumns { .. } => "missing_columns",
            AllocationError::NegativeFactorValue { .. } => "negative_factor_value",
            AllocationError::InconsistentWeighting { .. } => "inconsistent_weighting",
        }
    }
}

/// Result type alias for allocation operations
pub type UtprResult<T> = Result<T, AllocationError>;
