//! CSV file backend for the Aula planning store.
//!
//! Persists the planning tables, NRC ledger, and evaluation results as plain
//! CSV files under two directories (uploads and processed output). Writes are
//! whole-file rewrites; appends read the existing sheet, add the row, and
//! rewrite it.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::CsvStore;
