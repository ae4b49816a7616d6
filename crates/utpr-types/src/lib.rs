//! UTPR Types
//!
//! This crate defines the core value type shared across the UTPR allocation
//! ecosystem (`utpr-allocation` and `utpr-cli`). Factor tables arrive from
//! external sources with mixed numeric-or-text cells, so the shared
//! representation is a tagged `FieldValue` rather than a bare `f64`.

#![deny(warnings)]
#![deny(missing_docs)]

mod types;
pub use types::FieldValue;
