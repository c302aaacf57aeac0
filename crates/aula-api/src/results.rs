//! Handlers for the evaluation-result append endpoints.
//!
//! `POST /guardar_resultado` (project form) and `POST /guardar_resultado_tp`
//! (theory-practice form). The body is a flat JSON object of form fields; it
//! is shaped against the form's fixed schema and appended to the form's
//! result sheet. Failures come back as `{status:"error", mensaje}` — the
//! caller never sees a fault beyond that envelope.

use axum::{Json, extract::State};
use aula_core::{
  results::{EvaluationForm, shape_row},
  store::PlanningStore,
};
use serde::Serialize;
use serde_json::Value;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SaveResponse {
  pub status:  &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mensaje: Option<String>,
}

impl SaveResponse {
  fn ok() -> Self {
    Self { status: "ok", mensaje: None }
  }

  fn error(mensaje: impl Into<String>) -> Self {
    Self { status: "error", mensaje: Some(mensaje.into()) }
  }
}

/// `POST /guardar_resultado`
pub async fn guardar_resultado<S>(
  State(state): State<AppState<S>>,
  Json(payload): Json<Value>,
) -> Json<SaveResponse>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  save(&state, EvaluationForm::Project, payload).await
}

/// `POST /guardar_resultado_tp`
pub async fn guardar_resultado_tp<S>(
  State(state): State<AppState<S>>,
  Json(payload): Json<Value>,
) -> Json<SaveResponse>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  save(&state, EvaluationForm::TheoryPractice, payload).await
}

async fn save<S>(
  state: &AppState<S>,
  form: EvaluationForm,
  payload: Value,
) -> Json<SaveResponse>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let Some(fields) = payload.as_object() else {
    return Json(SaveResponse::error("el cuerpo debe ser un objeto JSON"));
  };

  let row = shape_row(form.schema(), fields);
  match state.store.append_result(form, &row).await {
    Ok(()) => Json(SaveResponse::ok()),
    Err(e) => {
      tracing::error!(error = %e, ?form, "failed to append evaluation result");
      Json(SaveResponse::error(e.to_string()))
    }
  }
}
