//! Handlers for the cascading filter endpoints.
//!
//! | Path | Constraints | Returns |
//! |------|-------------|---------|
//! | `/get_anos` | — | `[int...]` |
//! | `/get_periodos` | `ano` | `[int...]` |
//! | `/get_sedes` | `ano, periodo` | `[string...]` |
//! | `/get_carreras` | `+ sede` | `[string...]` |
//! | `/get_secciones` | `+ carrera` | `[string...]` |
//! | `/get_asignaturas` | `+ seccion` | `[string...]` |
//! | `/get_instructores` | `+ asignatura` | `[string...]`, denylist-filtered |
//! | `/get_nrc` | all of the above `+ instructor` | `{nrc, sede_curso}` |
//! | `/get_tipo_curso_por_nrc` | `nrc` | `{tipo_curso}` |
//!
//! A missing or uncoercible constraint, or an unloaded table, yields an empty
//! list (or an all-null object) — never an HTTP error.

use axum::{
  Json,
  extract::{Query, State},
};
use aula_core::{
  record::{CourseSite, CourseType, Site},
  snapshot::SectionQuery,
  store::PlanningStore,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Every upstream selection of the cascade, all optional; each level requires
/// its own prefix.
#[derive(Debug, Deserialize, Default)]
pub struct CascadeParams {
  pub ano:        Option<String>,
  pub periodo:    Option<String>,
  pub sede:       Option<String>,
  pub carrera:    Option<String>,
  pub seccion:    Option<String>,
  pub asignatura: Option<String>,
  pub instructor: Option<String>,
  pub nrc:        Option<String>,
}

fn int(value: &Option<String>) -> Option<i32> {
  aula_core::table::parse_key_int(value.as_deref()?)
}

fn site(value: &Option<String>) -> Option<Site> {
  Site::from_label(value.as_deref()?)
}

fn text(value: &Option<String>) -> Option<&str> {
  let value = value.as_deref()?.trim();
  (!value.is_empty()).then_some(value)
}

// ─── Filter levels ───────────────────────────────────────────────────────────

/// `GET /get_anos`
pub async fn get_anos<S>(State(state): State<AppState<S>>) -> Json<Vec<i32>>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  match state.table.snapshot() {
    Some(snap) => Json(snap.years()),
    None => Json(Vec::new()),
  }
}

/// `GET /get_periodos?ano=`
pub async fn get_periodos<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<Vec<i32>>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let (Some(snap), Some(ano)) = (state.table.snapshot(), int(&params.ano))
  else {
    return Json(Vec::new());
  };
  Json(snap.terms(ano))
}

/// `GET /get_sedes?ano=&periodo=`
pub async fn get_sedes<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<Vec<Site>>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let (Some(snap), Some(ano), Some(periodo)) = (
    state.table.snapshot(),
    int(&params.ano),
    int(&params.periodo),
  ) else {
    return Json(Vec::new());
  };
  Json(snap.sites(ano, periodo))
}

/// `GET /get_carreras?ano=&periodo=&sede=`
pub async fn get_carreras<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<Vec<String>>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let (Some(snap), Some(ano), Some(periodo), Some(sede)) = (
    state.table.snapshot(),
    int(&params.ano),
    int(&params.periodo),
    site(&params.sede),
  ) else {
    return Json(Vec::new());
  };
  Json(snap.programs(ano, periodo, sede))
}

/// `GET /get_secciones?ano=&periodo=&sede=&carrera=`
pub async fn get_secciones<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<Vec<String>>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let (Some(snap), Some(ano), Some(periodo), Some(sede), Some(carrera)) = (
    state.table.snapshot(),
    int(&params.ano),
    int(&params.periodo),
    site(&params.sede),
    text(&params.carrera),
  ) else {
    return Json(Vec::new());
  };
  Json(
    snap
      .sections(ano, periodo, sede, carrera)
      .into_iter()
      .map(|s| s.to_string())
      .collect(),
  )
}

/// `GET /get_asignaturas?ano=&periodo=&sede=&carrera=&seccion=`
pub async fn get_asignaturas<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<Vec<String>>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let (Some(snap), Some(ano), Some(periodo), Some(sede), Some(carrera), Some(seccion)) = (
    state.table.snapshot(),
    int(&params.ano),
    int(&params.periodo),
    site(&params.sede),
    text(&params.carrera),
    int(&params.seccion),
  ) else {
    return Json(Vec::new());
  };
  Json(snap.subjects(ano, periodo, sede, carrera, seccion))
}

/// `GET /get_instructores?ano=&periodo=&sede=&carrera=&seccion=&asignatura=`
pub async fn get_instructores<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<Vec<String>>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let (
    Some(snap),
    Some(ano),
    Some(periodo),
    Some(sede),
    Some(carrera),
    Some(seccion),
    Some(asignatura),
  ) = (
    state.table.snapshot(),
    int(&params.ano),
    int(&params.periodo),
    site(&params.sede),
    text(&params.carrera),
    int(&params.seccion),
    text(&params.asignatura),
  )
  else {
    return Json(Vec::new());
  };
  Json(snap.instructors(ano, periodo, sede, carrera, seccion, asignatura))
}

// ─── Terminal lookups ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NrcResponse {
  pub nrc:        Option<String>,
  pub sede_curso: Option<CourseSite>,
}

impl NrcResponse {
  fn empty() -> Self {
    Self { nrc: None, sede_curso: None }
  }
}

/// `GET /get_nrc?ano=&periodo=&sede=&carrera=&seccion=&asignatura=&instructor=`
pub async fn get_nrc<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<NrcResponse>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let query = (|| {
    Some(SectionQuery {
      year:       int(&params.ano)?,
      term:       int(&params.periodo)?,
      site:       site(&params.sede)?,
      program:    text(&params.carrera)?.to_string(),
      section:    int(&params.seccion)?,
      subject:    text(&params.asignatura)?.to_string(),
      instructor: text(&params.instructor)?.to_string(),
    })
  })();

  let (Some(snap), Some(query)) = (state.table.snapshot(), query) else {
    return Json(NrcResponse::empty());
  };

  match snap.resolve_nrc(&query) {
    Some(hit) => Json(NrcResponse {
      nrc:        Some(hit.nrc.to_string()),
      sede_curso: hit.course_site,
    }),
    None => Json(NrcResponse::empty()),
  }
}

#[derive(Debug, Serialize)]
pub struct CourseTypeResponse {
  pub tipo_curso: Option<CourseType>,
}

/// `GET /get_tipo_curso_por_nrc?nrc=`
pub async fn get_tipo_curso_por_nrc<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<CascadeParams>,
) -> Json<CourseTypeResponse>
where
  S: PlanningStore + Clone + Send + Sync + 'static,
{
  let (Some(snap), Some(nrc)) = (state.table.snapshot(), text(&params.nrc))
  else {
    return Json(CourseTypeResponse { tipo_curso: None });
  };
  Json(CourseTypeResponse { tipo_curso: snap.course_type_for(nrc) })
}
