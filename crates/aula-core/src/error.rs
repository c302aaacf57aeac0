//! Error types for `aula-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("required column missing: {0:?}")]
  MissingColumn(&'static str),

  #[error("cannot parse cell {column:?} on row {row}: {value:?}")]
  BadCell {
    column: &'static str,
    row:    usize,
    value:  String,
  },

  #[error("nrc ledger has duplicate key for nrc {0}")]
  DuplicateLedgerKey(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
