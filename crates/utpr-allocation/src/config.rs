//! Allocation configuration.

use serde::{Deserialize, Serialize};

/// Tolerance applied when checking that the factor weights sum to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration for one allocation pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AllocationConfig {
    /// Total residual top-up tax amount to be allocated.
    pub residual_top_up_tax: f64,
    /// Weight assigned to the payroll factor.
    pub payroll_weight: f64,
    /// Weight assigned to the tangible-asset factor.
    pub asset_weight: f64,
}

impl AllocationConfig {
    /// Create a configuration with the default equal factor weights (0.5/0.5).
    pub fn new(residual_top_up_tax: f64) -> Self {
        Self { residual_top_up_tax, payroll_weight: 0.5, asset_weight: 0.5 }
    }

    /// Override the factor weights.
    pub fn with_weights(mut self, payroll_weight: f64, asset_weight: f64) -> Self {
        self.payroll_weight = payroll_weight;
        self.asset_weight = asset_weight;
        self
    }

    /// Whether the weights sum to 1 within [`WEIGHT_SUM_TOLERANCE`].
    pub fn weights_are_consistent(&self) -> bool {
        (self.payroll_weight + self.asset_weight - 1.0).abs() < WEIGHT_SUM_TOLERANCE
    }
}
