//! Errors surfaced by the reload pipeline.
//!
//! Filter endpoints never fail on the wire (an unloaded or unmatched query is
//! an empty list); reload and append failures are folded into the
//! `{status:"error"}` envelope at the handler boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReloadError {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("preparation error: {0}")]
  Prepare(#[from] aula_core::Error),
}
