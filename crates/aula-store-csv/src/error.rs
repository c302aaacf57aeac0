//! Error types for `aula-store-csv`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("raw planning table not found: {0}")]
  RawMissing(PathBuf),

  #[error(transparent)]
  Core(#[from] aula_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
