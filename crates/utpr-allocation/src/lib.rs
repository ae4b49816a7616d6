#![deny(warnings)]
//! The allocation engine for UTPR residual top-up tax.
//!
//! This crate provides the `Allocator`, which distributes a residual top-up
//! tax amount across constituent entities in proportion to weighted shares of
//! a payroll factor and a tangible-asset factor, reconciling rounding error so
//! the allocated column sums exactly to the input amount.

pub mod allocator;
pub mod config;
pub mod error;
pub mod table;

pub use allocator::{
    ALLOCATED_TAX_COLUMN, ALLOCATION_WEIGHT_COLUMN, ASSET_SHARE_COLUMN, AllocatedEntity,
    AllocationResult, Allocator, PAYROLL_SHARE_COLUMN,
};
pub use config::AllocationConfig;
pub use error::{AllocationError, UtprResult};
pub use table::{EntityRecord, FactorTable, ASSETS_COLUMN, EMPLOYEES_COLUMN};
