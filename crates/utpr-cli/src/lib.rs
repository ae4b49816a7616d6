#![deny(warnings)]
//! Thin I/O collaborators around the UTPR allocation engine: the CSV loader
//! that produces the in-memory factor table and the exporters that render an
//! allocation result. All allocation semantics live in `utpr-allocation`.

pub mod export;
pub mod loader;
