//! The preparation pipeline and its trigger endpoints.
//!
//! `POST /load_data` and `GET /cronjob_load_data` (for scheduled invocation)
//! both re-run preparation: read the raw upload, enrich, assign NRCs through
//! the persisted ledger, persist the enriched table and the updated ledger,
//! then swap the new snapshot in. Any failure leaves the previous snapshot
//! untouched and answers with the error envelope.

use axum::{Json, extract::State};
use aula_core::{enrich::prepare, snapshot::TableSnapshot, store::PlanningStore};
use serde::Serialize;

use crate::{AppState, error::ReloadError};

/// Counts reported by a successful preparation run.
#[derive(Debug, Clone, Copy)]
pub struct ReloadStats {
  pub records: usize,
  pub skipped: usize,
}

/// Run the full preparation pipeline and swap the snapshot.
pub async fn run<S>(state: &AppState<S>) -> Result<ReloadStats, ReloadError>
where
  S: PlanningStore,
{
  let raw = state.store.load_raw().await.map_err(box_store)?;
  let mut ledger = state.store.load_ledger().await.map_err(box_store)?;

  let prepared = prepare(&raw, &mut ledger)?;

  state.store.save_ledger(&ledger).await.map_err(box_store)?;
  state
    .store
    .save_enriched(&prepared.table)
    .await
    .map_err(box_store)?;

  let snapshot = TableSnapshot::new(prepared.records);
  let stats = ReloadStats {
    records: snapshot.len(),
    skipped: prepared.skipped,
  };
  state.table.install(snapshot);
  Ok(stats)
}

/// Startup load: prepare from the raw upload, fall back to the persisted
/// enriched sheet, otherwise stay unloaded. Never fails the process.
pub async fn bootstrap<S>(state: &AppState<S>)
where
  S: PlanningStore,
{
  match run(state).await {
    Ok(stats) => {
      tracing::info!(
        records = stats.records,
        skipped = stats.skipped,
        "planning table prepared"
      );
      return;
    }
    Err(e) => {
      tracing::warn!(
        error = %e,
        "preparation failed at startup; trying the persisted enriched sheet"
      );
    }
  }

  match state.store.load_enriched().await {
    Ok(Some(table)) => match table.records() {
      Ok(parsed) => {
        tracing::info!(
          records = parsed.records.len(),
          skipped = parsed.skipped,
          "loaded persisted enriched table"
        );
        state.table.install(TableSnapshot::new(parsed.records));
      }
      Err(e) => {
        tracing::error!(error = %e, "persisted enriched table is unreadable; starting unloaded");
      }
    },
    Ok(None) => {
      tracing::warn!("no persisted enriched table; starting unloaded");
    }
    Err(e) => {
      tracing::error!(error = %e, "cannot read persisted enriched table; starting unloaded");
    }
  }
}

// ─── Endpoints ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
  pub status:    &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub registros: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mensaje:   Option<String>,
}

/// `POST /load_data` and `GET /cronjob_load_data`
pub async fn load_data<S>(
  State(state): State<AppState<S>>,
) -> Json<ReloadResponse>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  match run(&state).await {
    Ok(stats) => {
      tracing::info!(
        records = stats.records,
        skipped = stats.skipped,
        "planning table reloaded"
      );
      Json(ReloadResponse {
        status:    "ok",
        registros: Some(stats.records),
        mensaje:   None,
      })
    }
    Err(e) => {
      tracing::error!(error = %e, "reload failed; previous table kept");
      Json(ReloadResponse {
        status:    "error",
        registros: None,
        mensaje:   Some(e.to_string()),
      })
    }
  }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status:         &'static str,
  pub datos_cargados: bool,
}

/// `GET /health`
pub async fn health<S>(
  State(state): State<AppState<S>>,
) -> Json<HealthResponse>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  Json(HealthResponse {
    status:         "ok",
    datos_cargados: state.table.is_loaded(),
  })
}

fn box_store<E>(e: E) -> ReloadError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ReloadError::Store(Box::new(e))
}
