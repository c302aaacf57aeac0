//! Evaluation-result schemas and payload shaping.
//!
//! Each form has a fixed, ordered column list. Shaping a payload against a
//! schema fills missing fields with empty strings and drops extras; no value
//! validation happens anywhere — the store is append-only and trusts the
//! form.

use serde_json::{Map, Value};

/// The two evaluation forms, one per course type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationForm {
  /// Project / practicum courses.
  Project,
  /// Theory-practice courses.
  TheoryPractice,
}

const IDENTITY_COLUMNS: [&str; 8] = [
  "ANO",
  "PERIODO",
  "SEDE_CURSO",
  "Carrera",
  "Seccion",
  "Asignatura",
  "INSTRUCTOR",
  "NRC",
];

const PROJECT_SCHEMA: [&str; 10] = [
  "ANO",
  "PERIODO",
  "SEDE_CURSO",
  "Carrera",
  "Seccion",
  "Asignatura",
  "INSTRUCTOR",
  "NRC",
  "Eval_Aula",
  "Eval_Carpeta",
];

const THEORY_PRACTICE_SCHEMA: [&str; 12] = [
  "ANO",
  "PERIODO",
  "SEDE_CURSO",
  "Carrera",
  "Seccion",
  "Asignatura",
  "INSTRUCTOR",
  "NRC",
  "Eval_Teoria",
  "Eval_Practica",
  "Observaciones",
  "Recomendaciones",
];

impl EvaluationForm {
  /// The ordered column list of this form's result sheet.
  pub fn schema(self) -> &'static [&'static str] {
    match self {
      EvaluationForm::Project => &PROJECT_SCHEMA,
      EvaluationForm::TheoryPractice => &THEORY_PRACTICE_SCHEMA,
    }
  }

  /// Columns shared by both forms, identifying the evaluated section.
  pub fn identity_columns() -> &'static [&'static str] {
    &IDENTITY_COLUMNS
  }
}

/// Shape a JSON payload into one row of the form's schema: every expected
/// column present (empty string when absent), extra payload fields dropped.
pub fn shape_row(
  schema: &[&'static str],
  payload: &Map<String, Value>,
) -> Vec<String> {
  schema
    .iter()
    .map(|col| payload.get(*col).map(value_to_cell).unwrap_or_default())
    .collect()
}

fn value_to_cell(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn payload(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
  }

  #[test]
  fn missing_fields_default_to_empty_and_extras_are_dropped() {
    let row = shape_row(
      EvaluationForm::Project.schema(),
      &payload(json!({
        "ANO": 2024,
        "NRC": "1000",
        "Eval_Aula": 18,
        "campo_desconocido": "ignored"
      })),
    );

    assert_eq!(row.len(), EvaluationForm::Project.schema().len());
    assert_eq!(row[0], "2024");
    assert_eq!(row[7], "1000");
    assert_eq!(row[8], "18");
    // PERIODO was absent from the payload.
    assert_eq!(row[1], "");
    assert!(!row.contains(&"ignored".to_string()));
  }

  #[test]
  fn null_values_become_empty_cells() {
    let row = shape_row(
      EvaluationForm::TheoryPractice.schema(),
      &payload(json!({ "Observaciones": null })),
    );
    assert!(row.iter().all(String::is_empty));
  }

  #[test]
  fn both_schemas_share_the_identity_prefix() {
    for form in [EvaluationForm::Project, EvaluationForm::TheoryPractice] {
      assert_eq!(
        &form.schema()[..EvaluationForm::identity_columns().len()],
        EvaluationForm::identity_columns()
      );
    }
  }
}
