//! JSON HTTP layer for the Aula NRC lookup and evaluation-capture service.
//!
//! Exposes an axum [`Router`] backed by any [`PlanningStore`]. The enriched
//! planning table lives in an immutable snapshot behind [`SnapshotHolder`];
//! every filter endpoint reads the snapshot, the reload endpoints rebuild and
//! swap it.

pub mod cascade;
pub mod error;
pub mod reload;
pub mod results;
pub mod state;

pub use error::ReloadError;
pub use state::{SnapshotHolder, TableState};

use std::{path::PathBuf, sync::Arc};

use aula_core::store::PlanningStore;
use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8000
}

fn default_upload_dir() -> PathBuf {
  PathBuf::from("uploads")
}

fn default_processed_dir() -> PathBuf {
  PathBuf::from("procesados")
}

/// Runtime server configuration, deserialised from `config.toml` layered
/// under `AULA_`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// Where the raw planning upload lives.
  #[serde(default = "default_upload_dir")]
  pub upload_dir:    PathBuf,
  /// Where the enriched table, NRC ledger, and result sheets are written.
  #[serde(default = "default_processed_dir")]
  pub processed_dir: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PlanningStore> {
  pub store: Arc<S>,
  pub table: Arc<SnapshotHolder>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Cascade levels
    .route("/get_anos", get(cascade::get_anos::<S>))
    .route("/get_periodos", get(cascade::get_periodos::<S>))
    .route("/get_sedes", get(cascade::get_sedes::<S>))
    .route("/get_carreras", get(cascade::get_carreras::<S>))
    .route("/get_secciones", get(cascade::get_secciones::<S>))
    .route("/get_asignaturas", get(cascade::get_asignaturas::<S>))
    .route("/get_instructores", get(cascade::get_instructores::<S>))
    // Terminal lookups
    .route("/get_nrc", get(cascade::get_nrc::<S>))
    .route(
      "/get_tipo_curso_por_nrc",
      get(cascade::get_tipo_curso_por_nrc::<S>),
    )
    // Result capture
    .route("/guardar_resultado", post(results::guardar_resultado::<S>))
    .route(
      "/guardar_resultado_tp",
      post(results::guardar_resultado_tp::<S>),
    )
    // Reload triggers
    .route("/load_data", post(reload::load_data::<S>))
    .route("/cronjob_load_data", get(reload::load_data::<S>))
    .route("/health", get(reload::health::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use aula_store_csv::CsvStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  const RAW_CSV: &str = "\
ANO,PERIODO,Codigo_Carrera,Codigo_Curso,Seccion,Asignatura,Apellido_Docente,Nombre_Docente,Periodo_Nivel,FechaCierre
2024,1,AQPEOM,X1,1,PROYECTO I,QUISPE,MARIA,1,2024-07-31
2024,1,LIMSI,M2,1,MATEMATICA,ROJAS,JUAN,2,2024-07-31
2024,1,LIMSI,M2,2,MATEMATICA,AQP EOM AS,INSTRUCTOR,1,2024-07-31
";

  async fn make_state(raw: Option<&str>) -> (AppState<CsvStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::open(
      dir.path().join("uploads"),
      dir.path().join("procesados"),
    )
    .await
    .unwrap();
    if let Some(raw) = raw {
      std::fs::write(store.raw_path(), raw).unwrap();
    }
    let state = AppState {
      store: Arc::new(store),
      table: Arc::new(SnapshotHolder::new()),
    };
    (state, dir)
  }

  async fn loaded_state() -> (AppState<CsvStore>, TempDir) {
    let (state, dir) = make_state(Some(RAW_CSV)).await;
    reload::run(&state).await.expect("initial load");
    (state, dir)
  }

  async fn get_json(state: AppState<CsvStore>, uri: &str) -> Value {
    let resp = router(state)
      .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn post_json(state: AppState<CsvStore>, uri: &str, body: Value) -> Value {
    let resp = router(state)
      .oneshot(
        Request::builder()
          .method("POST")
          .uri(uri)
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(body.to_string()))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "POST {uri}");
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Unloaded behaviour ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn unloaded_table_yields_empty_lists() {
    let (state, _dir) = make_state(None).await;
    assert_eq!(get_json(state.clone(), "/get_anos").await, json!([]));
    assert_eq!(
      get_json(state.clone(), "/get_periodos?ano=2024").await,
      json!([])
    );
    assert_eq!(
      get_json(state, "/get_nrc?ano=2024&periodo=1&sede=FCHB&carrera=AQPEOM&seccion=1&asignatura=X&instructor=Y")
        .await,
      json!({ "nrc": null, "sede_curso": null })
    );
  }

  #[tokio::test]
  async fn health_reports_loadedness() {
    let (state, _dir) = make_state(None).await;
    assert_eq!(
      get_json(state.clone(), "/health").await,
      json!({ "status": "ok", "datos_cargados": false })
    );

    let (state, _dir) = loaded_state().await;
    assert_eq!(
      get_json(state, "/health").await,
      json!({ "status": "ok", "datos_cargados": true })
    );
  }

  // ── Cascade ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn cascade_narrows_level_by_level() {
    let (state, _dir) = loaded_state().await;

    assert_eq!(get_json(state.clone(), "/get_anos").await, json!([2024]));
    assert_eq!(
      get_json(state.clone(), "/get_periodos?ano=2024").await,
      json!([1])
    );
    assert_eq!(
      get_json(state.clone(), "/get_sedes?ano=2024&periodo=1").await,
      json!(["ABQ", "FCHB"])
    );
    assert_eq!(
      get_json(state.clone(), "/get_carreras?ano=2024&periodo=1&sede=FCHB")
        .await,
      json!(["AQPEOM"])
    );
    assert_eq!(
      get_json(
        state.clone(),
        "/get_secciones?ano=2024&periodo=1&sede=FCHB&carrera=AQPEOM"
      )
      .await,
      json!(["1"])
    );
    assert_eq!(
      get_json(
        state.clone(),
        "/get_asignaturas?ano=2024&periodo=1&sede=FCHB&carrera=AQPEOM&seccion=1"
      )
      .await,
      json!(["PROYECTO I"])
    );
    assert_eq!(
      get_json(
        state,
        "/get_instructores?ano=2024&periodo=1&sede=FCHB&carrera=AQPEOM&seccion=1&asignatura=PROYECTO%20I"
      )
      .await,
      json!(["QUISPE MARIA"])
    );
  }

  #[tokio::test]
  async fn bad_or_missing_constraints_yield_empty_lists() {
    let (state, _dir) = loaded_state().await;
    assert_eq!(
      get_json(state.clone(), "/get_periodos?ano=abc").await,
      json!([])
    );
    assert_eq!(get_json(state.clone(), "/get_periodos").await, json!([]));
    assert_eq!(
      get_json(state.clone(), "/get_periodos?ano=1999").await,
      json!([])
    );
    assert_eq!(
      get_json(state, "/get_sedes?ano=2024").await,
      json!([])
    );
  }

  #[tokio::test]
  async fn placeholder_instructors_are_denylisted() {
    let (state, _dir) = loaded_state().await;
    assert_eq!(
      get_json(
        state,
        "/get_instructores?ano=2024&periodo=1&sede=ABQ&carrera=LIMSI&seccion=2&asignatura=MATEMATICA"
      )
      .await,
      json!([])
    );
  }

  // ── Terminal lookups ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_nrc_resolves_the_fully_specified_section() {
    let (state, _dir) = loaded_state().await;
    assert_eq!(
      get_json(
        state.clone(),
        "/get_nrc?ano=2024&periodo=1&sede=FCHB&carrera=AQPEOM&seccion=1&asignatura=PROYECTO%20I&instructor=QUISPE%20MARIA"
      )
      .await,
      json!({ "nrc": "1000", "sede_curso": "FCHB" })
    );
    // No matching row.
    assert_eq!(
      get_json(
        state,
        "/get_nrc?ano=2024&periodo=1&sede=IRQ&carrera=AQPEOM&seccion=1&asignatura=PROYECTO%20I&instructor=QUISPE%20MARIA"
      )
      .await,
      json!({ "nrc": null, "sede_curso": null })
    );
  }

  #[tokio::test]
  async fn course_type_lookup_by_nrc() {
    let (state, _dir) = loaded_state().await;
    assert_eq!(
      get_json(state.clone(), "/get_tipo_curso_por_nrc?nrc=1000").await,
      json!({ "tipo_curso": "PROJECT" })
    );
    assert_eq!(
      get_json(state.clone(), "/get_tipo_curso_por_nrc?nrc=1001").await,
      json!({ "tipo_curso": "THEORY-PRACTICE" })
    );
    assert_eq!(
      get_json(state, "/get_tipo_curso_por_nrc?nrc=9999").await,
      json!({ "tipo_curso": null })
    );
  }

  // ── Reload ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn load_data_reports_counts_and_is_stable_across_runs() {
    let (state, _dir) = make_state(Some(RAW_CSV)).await;

    let first = post_json(state.clone(), "/load_data", json!({})).await;
    assert_eq!(first, json!({ "status": "ok", "registros": 3 }));

    // Re-running on unchanged input keeps every NRC.
    let second = post_json(state.clone(), "/load_data", json!({})).await;
    assert_eq!(second, json!({ "status": "ok", "registros": 3 }));
    assert_eq!(
      get_json(
        state,
        "/get_nrc?ano=2024&periodo=1&sede=FCHB&carrera=AQPEOM&seccion=1&asignatura=PROYECTO%20I&instructor=QUISPE%20MARIA"
      )
      .await,
      json!({ "nrc": "1000", "sede_curso": "FCHB" })
    );
  }

  #[tokio::test]
  async fn load_data_without_an_upload_is_an_error_envelope() {
    let (state, _dir) = make_state(None).await;
    let resp = post_json(state.clone(), "/load_data", json!({})).await;
    assert_eq!(resp["status"], "error");
    assert!(resp["mensaje"].is_string());
    // The holder stays unloaded.
    assert!(!state.table.is_loaded());
  }

  #[tokio::test]
  async fn cronjob_trigger_shares_the_reload_path() {
    let (state, _dir) = make_state(Some(RAW_CSV)).await;
    let resp = get_json(state, "/cronjob_load_data").await;
    assert_eq!(resp, json!({ "status": "ok", "registros": 3 }));
  }

  // ── Result capture ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn guardar_resultado_appends_without_deduplicating() {
    let (state, _dir) = loaded_state().await;
    let payload = json!({
      "ANO": 2024,
      "PERIODO": 1,
      "SEDE_CURSO": "FCHB",
      "Carrera": "AQPEOM",
      "Seccion": 1,
      "Asignatura": "PROYECTO I",
      "INSTRUCTOR": "QUISPE MARIA",
      "NRC": "1000",
      "Eval_Aula": 18,
      "Eval_Carpeta": 17
    });

    let first =
      post_json(state.clone(), "/guardar_resultado", payload.clone()).await;
    assert_eq!(first, json!({ "status": "ok" }));
    let second =
      post_json(state.clone(), "/guardar_resultado", payload).await;
    assert_eq!(second, json!({ "status": "ok" }));

    let sheet = std::fs::read_to_string(
      state
        .store
        .results_path(aula_core::results::EvaluationForm::Project),
    )
    .unwrap();
    // Header plus two identical rows.
    assert_eq!(sheet.lines().count(), 3);
  }

  #[tokio::test]
  async fn guardar_resultado_tp_uses_its_own_sheet() {
    let (state, _dir) = loaded_state().await;
    let resp = post_json(
      state.clone(),
      "/guardar_resultado_tp",
      json!({ "NRC": "1001", "Eval_Teoria": 15 }),
    )
    .await;
    assert_eq!(resp, json!({ "status": "ok" }));

    let sheet = std::fs::read_to_string(
      state
        .store
        .results_path(aula_core::results::EvaluationForm::TheoryPractice),
    )
    .unwrap();
    let mut lines = sheet.lines();
    assert!(lines.next().unwrap().contains("Eval_Teoria"));
    // Missing fields default to empty cells.
    assert!(lines.next().unwrap().contains("1001"));
  }

  #[tokio::test]
  async fn non_object_payload_is_an_error_envelope() {
    let (state, _dir) = loaded_state().await;
    let resp =
      post_json(state, "/guardar_resultado", json!(["not", "an", "object"]))
        .await;
    assert_eq!(resp["status"], "error");
  }
}
