//! The `PlanningStore` trait.
//!
//! Implemented by storage backends (e.g. `aula-store-csv`; hosted deployments
//! put the same seam in front of an object-store bucket or a remote
//! spreadsheet API). Higher layers depend on this abstraction, not on any
//! concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (tokio with axum).

use std::future::Future;

use crate::{
  nrc::NrcLedger,
  results::EvaluationForm,
  table::{EnrichedTable, RawTable},
};

pub trait PlanningStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Planning table ────────────────────────────────────────────────────

  /// Read the raw uploaded planning table. A missing upload is an error —
  /// there is nothing to prepare from.
  fn load_raw(
    &self,
  ) -> impl Future<Output = Result<RawTable, Self::Error>> + Send + '_;

  /// Read the previously persisted enriched table, if any.
  fn load_enriched(
    &self,
  ) -> impl Future<Output = Result<Option<EnrichedTable>, Self::Error>> + Send + '_;

  /// Persist the enriched table wholesale (replace-only, no partial update).
  fn save_enriched<'a>(
    &'a self,
    table: &'a EnrichedTable,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── NRC ledger ────────────────────────────────────────────────────────

  /// Read the persisted key → NRC ledger; empty when never persisted.
  fn load_ledger(
    &self,
  ) -> impl Future<Output = Result<NrcLedger, Self::Error>> + Send + '_;

  /// Persist the ledger in full.
  fn save_ledger<'a>(
    &'a self,
    ledger: &'a NrcLedger,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Evaluation results ────────────────────────────────────────────────

  /// Append one shaped row to the form's result sheet, creating the sheet
  /// with the form's schema when it does not exist yet. Never deduplicates.
  fn append_result<'a>(
    &'a self,
    form: EvaluationForm,
    row: &'a [String],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
