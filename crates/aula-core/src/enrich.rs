//! Dataset preparation — derive the enriched planning table from the raw
//! upload and assign NRCs.
//!
//! All derivations are pure functions of single cells:
//!
//! | column           | derived from     | rule                                |
//! |------------------|------------------|-------------------------------------|
//! | `SEDE_PRINCIPAL` | `Codigo_Carrera` | three fixed disjoint program sets   |
//! | `SEDE_CURSO`     | `Asignatura`     | employability list overrides site   |
//! | `MODALIDAD`      | `Periodo_Nivel`  | 1, 3 → in-person; 2 → virtual       |
//! | `Tipo_Curso`     | `Asignatura`     | `PROYECTO`/`EFSRT` prefix → project |
//! | `INSTRUCTOR`     | both docente cols| `"LASTNAME FIRSTNAME"`              |

use crate::{
  Result,
  nrc::NrcLedger,
  record::{CourseSite, CourseType, Modality, PlanningRecord, SectionKey, Site},
  table::{EnrichedTable, RawTable, cell, columns, parse_key_int},
};

// ─── Fixed sets ──────────────────────────────────────────────────────────────

const FCHB_PROGRAMS: [&str; 5] =
  ["AQPEOM", "AQPSI", "AQPPM", "AQPMMP", "AQPMSEII"];
const ABQ_PROGRAMS: [&str; 3] = ["LIMEOM", "LIMSI", "LIMPM"];
const IRQ_PROGRAMS: [&str; 2] = ["LIMMMP", "LIMMSEII"];

/// Subjects evaluated under the pooled employability label regardless of the
/// program's site. Matched case-insensitively.
const EMPLOYABILITY_SUBJECTS: [&str; 6] = [
  "MARCA PROFESIONAL",
  "COMUNICACIÓN PROFESIONAL",
  "LIDERAZGO PROFESIONAL",
  "INNOVACIÓN TECNOLÓGICA",
  "INGLÉS TÉCNICO",
  "INFORMÁTICA BÁSICA",
];

const PROJECT_PREFIXES: [&str; 2] = ["PROYECTO", "EFSRT"];

// ─── Cell derivations ────────────────────────────────────────────────────────

pub fn site_for(program_code: &str) -> Option<Site> {
  let code = program_code.trim();
  if FCHB_PROGRAMS.contains(&code) {
    Some(Site::Fchb)
  } else if ABQ_PROGRAMS.contains(&code) {
    Some(Site::Abq)
  } else if IRQ_PROGRAMS.contains(&code) {
    Some(Site::Irq)
  } else {
    None
  }
}

pub fn is_employability(subject: &str) -> bool {
  let subject = subject.trim().to_uppercase();
  EMPLOYABILITY_SUBJECTS.contains(&subject.as_str())
}

pub fn course_site_for(subject: &str, site: Option<Site>) -> Option<CourseSite> {
  if is_employability(subject) {
    Some(CourseSite::Employability)
  } else {
    site.map(CourseSite::from)
  }
}

pub fn modality_for(periodo_nivel: &str) -> Option<Modality> {
  match parse_key_int(periodo_nivel)? {
    1 | 3 => Some(Modality::InPerson),
    2 => Some(Modality::Virtual),
    _ => None,
  }
}

pub fn course_type_for(subject: &str) -> CourseType {
  let subject = subject.trim().to_uppercase();
  if PROJECT_PREFIXES.iter().any(|p| subject.starts_with(p)) {
    CourseType::Project
  } else {
    CourseType::TheoryPractice
  }
}

pub fn instructor_name(last: &str, first: &str) -> String {
  format!("{} {}", last.trim(), first.trim()).trim().to_string()
}

// ─── Preparation ─────────────────────────────────────────────────────────────

/// Outcome of a preparation run over one raw table.
#[derive(Debug)]
pub struct Prepared {
  /// The persisted layout: raw columns with the derived block inserted after
  /// the `FechaCierre` anchor (appended when the anchor is absent) and `NRC`
  /// last.
  pub table:   EnrichedTable,
  /// The same rows, typed, in table order.
  pub records: Vec<PlanningRecord>,
  /// Rows dropped because a key cell (`ANO`, `PERIODO`, `Seccion`) failed to
  /// coerce to an integer.
  pub skipped: usize,
}

const DERIVED_COLUMNS: [&str; 5] = [
  columns::SEDE_PRINCIPAL,
  columns::SEDE_CURSO,
  columns::MODALIDAD,
  columns::TIPO_CURSO,
  columns::INSTRUCTOR,
];

/// Enrich `raw` and assign NRCs through `ledger`.
///
/// Errors when a required raw column is missing; the ledger is only mutated
/// after that check passes, so a failed run leaves it untouched.
pub fn prepare(raw: &RawTable, ledger: &mut NrcLedger) -> Result<Prepared> {
  use columns as c;

  let ano = raw.require(c::ANO)?;
  let periodo = raw.require(c::PERIODO)?;
  let codigo_carrera = raw.require(c::CODIGO_CARRERA)?;
  let codigo_curso = raw.require(c::CODIGO_CURSO)?;
  let seccion = raw.require(c::SECCION)?;
  let asignatura = raw.require(c::ASIGNATURA)?;
  let apellido = raw.require(c::APELLIDO_DOCENTE)?;
  let nombre = raw.require(c::NOMBRE_DOCENTE)?;

  let periodo_nivel = raw.column(c::PERIODO_NIVEL);
  let carrera = raw.column(c::CARRERA);

  // The derived block goes right after the anchor column, at the end when the
  // anchor is absent.
  let insert_at = raw
    .column(c::FECHA_CIERRE)
    .map(|i| i + 1)
    .unwrap_or(raw.headers.len());

  let mut headers = raw.headers.clone();
  headers.splice(
    insert_at..insert_at,
    DERIVED_COLUMNS.iter().map(|h| h.to_string()),
  );
  if carrera.is_none() {
    headers.push(c::CARRERA.to_string());
  }
  headers.push(c::NRC.to_string());

  let mut rows = Vec::with_capacity(raw.rows.len());
  let mut records = Vec::with_capacity(raw.rows.len());
  let mut skipped = 0usize;

  for row in &raw.rows {
    let keys = (
      parse_key_int(cell(row, ano)),
      parse_key_int(cell(row, periodo)),
      parse_key_int(cell(row, seccion)),
    );
    let (Some(year), Some(term), Some(section)) = keys else {
      skipped += 1;
      continue;
    };

    let program_code = cell(row, codigo_carrera).trim().to_string();
    let course_code = cell(row, codigo_curso).trim().to_string();
    let subject = cell(row, asignatura).trim().to_string();
    let program = carrera
      .map(|i| cell(row, i).trim().to_string())
      .filter(|p| !p.is_empty())
      .unwrap_or_else(|| program_code.clone());

    let site = site_for(&program_code);
    let course_site = course_site_for(&subject, site);
    let modality =
      periodo_nivel.and_then(|i| modality_for(cell(row, i)));
    let course_type = course_type_for(&subject);
    let instructor =
      instructor_name(cell(row, apellido), cell(row, nombre));

    let key = SectionKey {
      year,
      term,
      program_code: program_code.clone(),
      course_code: course_code.clone(),
      section,
    };
    let nrc = ledger.assign(&key);

    // Persisted row: raw cells padded to header width, derived block spliced
    // in, optional Carrera fallback, NRC last.
    let mut out: Vec<String> = (0..raw.headers.len())
      .map(|i| cell(row, i).to_string())
      .collect();
    out.splice(
      insert_at..insert_at,
      [
        site.map(|s| s.as_str().to_string()).unwrap_or_default(),
        course_site.map(|s| s.as_str().to_string()).unwrap_or_default(),
        modality.map(|m| m.as_str().to_string()).unwrap_or_default(),
        course_type.as_str().to_string(),
        instructor.clone(),
      ],
    );
    if carrera.is_none() {
      out.push(program.clone());
    }
    out.push(nrc.to_string());
    rows.push(out);

    records.push(PlanningRecord {
      year,
      term,
      program_code,
      program,
      course_code,
      section,
      subject,
      instructor,
      site,
      course_site,
      modality,
      course_type,
      nrc,
    });
  }

  Ok(Prepared {
    table: EnrichedTable { headers, rows },
    records,
    skipped,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn s(v: &[&str]) -> Vec<String> {
    v.iter().map(|x| x.to_string()).collect()
  }

  fn raw(rows: Vec<Vec<String>>) -> RawTable {
    RawTable::new(
      s(&[
        "ANO",
        "PERIODO",
        "Codigo_Carrera",
        "Codigo_Curso",
        "Seccion",
        "Asignatura",
        "Apellido_Docente",
        "Nombre_Docente",
        "Periodo_Nivel",
        "FechaCierre",
      ]),
      rows,
    )
  }

  fn row(program: &str, section: &str, subject: &str) -> Vec<String> {
    s(&[
      "2024", "1", program, "X1", section, subject, "QUISPE", "MARIA", "1",
      "2024-07-31",
    ])
  }

  #[test]
  fn site_derivation_covers_the_three_sets() {
    assert_eq!(site_for("AQPEOM"), Some(Site::Fchb));
    assert_eq!(site_for("LIMSI"), Some(Site::Abq));
    assert_eq!(site_for("LIMMMP"), Some(Site::Irq));
    assert_eq!(site_for("ZZZ"), None);
  }

  #[test]
  fn employability_subject_overrides_the_site() {
    assert_eq!(
      course_site_for("Inglés Técnico", Some(Site::Fchb)),
      Some(CourseSite::Employability)
    );
    assert_eq!(
      course_site_for("PROYECTO I", Some(Site::Fchb)),
      Some(CourseSite::Fchb)
    );
    assert_eq!(course_site_for("PROYECTO I", None), None);
  }

  #[test]
  fn modality_mapping() {
    assert_eq!(modality_for("1"), Some(Modality::InPerson));
    assert_eq!(modality_for("3"), Some(Modality::InPerson));
    assert_eq!(modality_for("2"), Some(Modality::Virtual));
    assert_eq!(modality_for("7"), None);
    assert_eq!(modality_for(""), None);
  }

  #[test]
  fn course_type_from_subject_prefix() {
    assert_eq!(course_type_for("PROYECTO I"), CourseType::Project);
    assert_eq!(course_type_for("efsrt ii"), CourseType::Project);
    assert_eq!(course_type_for("MATEMÁTICA"), CourseType::TheoryPractice);
  }

  #[test]
  fn prepare_assigns_nrcs_in_first_encounter_order() {
    let mut ledger = NrcLedger::new();
    let prepared = prepare(
      &raw(vec![
        row("AQPEOM", "1", "PROYECTO I"),
        row("AQPEOM", "2", "PROYECTO I"),
        row("AQPEOM", "1", "PROYECTO I"),
      ]),
      &mut ledger,
    )
    .unwrap();

    let nrcs: Vec<u32> = prepared.records.iter().map(|r| r.nrc).collect();
    assert_eq!(nrcs, vec![1000, 1001, 1000]);
  }

  #[test]
  fn prepare_is_stable_across_runs() {
    let input = raw(vec![
      row("AQPEOM", "1", "PROYECTO I"),
      row("LIMSI", "1", "MATEMÁTICA"),
    ]);

    let mut ledger = NrcLedger::new();
    let first = prepare(&input, &mut ledger).unwrap();
    let second = prepare(&input, &mut ledger).unwrap();

    let a: Vec<u32> = first.records.iter().map(|r| r.nrc).collect();
    let b: Vec<u32> = second.records.iter().map(|r| r.nrc).collect();
    assert_eq!(a, b);
    assert_eq!(ledger.len(), 2);
  }

  #[test]
  fn prepare_inserts_derived_columns_after_the_anchor() {
    let mut ledger = NrcLedger::new();
    let prepared =
      prepare(&raw(vec![row("AQPEOM", "1", "PROYECTO I")]), &mut ledger)
        .unwrap();

    let headers = &prepared.table.headers;
    let anchor = headers.iter().position(|h| h == "FechaCierre").unwrap();
    assert_eq!(headers[anchor + 1], "SEDE_PRINCIPAL");
    assert_eq!(headers[anchor + 2], "SEDE_CURSO");
    assert_eq!(headers[anchor + 3], "MODALIDAD");
    assert_eq!(headers[anchor + 4], "Tipo_Curso");
    assert_eq!(headers[anchor + 5], "INSTRUCTOR");
    assert_eq!(headers.last().map(String::as_str), Some("NRC"));
    // No raw Carrera column, so the fallback is appended.
    assert!(headers.iter().any(|h| h == "Carrera"));

    // The enriched table parses back to the same typed rows.
    let parsed = prepared.table.records().unwrap();
    assert_eq!(parsed.skipped, 0);
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].instructor, "QUISPE MARIA");
    assert_eq!(parsed.records[0].program, "AQPEOM");
  }

  #[test]
  fn prepare_skips_rows_with_uncoercible_keys() {
    let mut ledger = NrcLedger::new();
    let mut bad = row("AQPEOM", "1", "PROYECTO I");
    bad[0] = "not-a-year".to_string();

    let prepared = prepare(
      &raw(vec![bad, row("AQPEOM", "2", "PROYECTO I")]),
      &mut ledger,
    )
    .unwrap();
    assert_eq!(prepared.skipped, 1);
    assert_eq!(prepared.records.len(), 1);
  }

  #[test]
  fn prepare_without_required_column_fails_and_leaves_ledger_alone() {
    let mut ledger = NrcLedger::new();
    let broken = RawTable::new(s(&["ANO", "PERIODO"]), vec![]);
    assert!(matches!(
      prepare(&broken, &mut ledger),
      Err(Error::MissingColumn(_))
    ));
    assert!(ledger.is_empty());
  }
}
