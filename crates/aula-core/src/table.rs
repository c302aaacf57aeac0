//! String-table representations of the planning spreadsheets.
//!
//! Storage backends deal only in headers + string rows; everything typed
//! happens here and in [`crate::enrich`]. Key columns are coerced to fixed
//! types exactly once, at load — rows whose key cells do not parse are
//! skipped and counted, never an error for the whole table.

use crate::{
  Error, Result,
  record::{CourseSite, CourseType, Modality, PlanningRecord, Site},
};

/// Fixed column names of the planning spreadsheets.
pub mod columns {
  pub const ANO: &str = "ANO";
  pub const PERIODO: &str = "PERIODO";
  pub const CODIGO_CARRERA: &str = "Codigo_Carrera";
  pub const CODIGO_CURSO: &str = "Codigo_Curso";
  pub const SECCION: &str = "Seccion";
  pub const ASIGNATURA: &str = "Asignatura";
  pub const APELLIDO_DOCENTE: &str = "Apellido_Docente";
  pub const NOMBRE_DOCENTE: &str = "Nombre_Docente";
  pub const PERIODO_NIVEL: &str = "Periodo_Nivel";
  pub const CARRERA: &str = "Carrera";
  pub const FECHA_CIERRE: &str = "FechaCierre";

  pub const SEDE_PRINCIPAL: &str = "SEDE_PRINCIPAL";
  pub const SEDE_CURSO: &str = "SEDE_CURSO";
  pub const MODALIDAD: &str = "MODALIDAD";
  pub const TIPO_CURSO: &str = "Tipo_Curso";
  pub const INSTRUCTOR: &str = "INSTRUCTOR";
  pub const NRC: &str = "NRC";
}

// ─── Raw table ───────────────────────────────────────────────────────────────

/// The uploaded planning table, as read from disk: a header row plus string
/// rows. Rows may be ragged; missing cells read as empty.
#[derive(Debug, Clone)]
pub struct RawTable {
  pub headers: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

impl RawTable {
  pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
    Self { headers, rows }
  }

  /// Index of a column by exact header name.
  pub fn column(&self, name: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == name)
  }

  /// Index of a column that must exist.
  pub fn require(&self, name: &'static str) -> Result<usize> {
    self.column(name).ok_or(Error::MissingColumn(name))
  }
}

/// Cell accessor tolerant of ragged rows.
pub fn cell(row: &[String], idx: usize) -> &str {
  row.get(idx).map(String::as_str).unwrap_or("")
}

/// Coerce a key cell to an integer. Tolerates surrounding whitespace and a
/// trailing `.0` (spreadsheet tools export integer columns as floats).
pub fn parse_key_int(value: &str) -> Option<i32> {
  let value = value.trim();
  if let Ok(n) = value.parse::<i32>() {
    return Some(n);
  }
  value.strip_suffix(".0").and_then(|v| v.parse().ok())
}

// ─── Enriched table ──────────────────────────────────────────────────────────

/// The processed planning table: every raw column, the five derived columns
/// inserted after the `FechaCierre` anchor, and `NRC` last. This is the
/// persisted layout; [`EnrichedTable::records`] parses it back into typed
/// rows.
#[derive(Debug, Clone)]
pub struct EnrichedTable {
  pub headers: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

/// Result of parsing an enriched table: the typed records, plus a count of
/// rows that were dropped because a key cell failed to coerce.
#[derive(Debug)]
pub struct ParsedRecords {
  pub records: Vec<PlanningRecord>,
  pub skipped: usize,
}

impl EnrichedTable {
  fn column(&self, name: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == name)
  }

  fn require(&self, name: &'static str) -> Result<usize> {
    self.column(name).ok_or(Error::MissingColumn(name))
  }

  /// Parse the string table into typed [`PlanningRecord`]s.
  ///
  /// Errors only when a required column is missing entirely; individual rows
  /// with uncoercible key cells are skipped and counted.
  pub fn records(&self) -> Result<ParsedRecords> {
    use columns as c;

    let ano = self.require(c::ANO)?;
    let periodo = self.require(c::PERIODO)?;
    let codigo_carrera = self.require(c::CODIGO_CARRERA)?;
    let carrera = self.require(c::CARRERA)?;
    let codigo_curso = self.require(c::CODIGO_CURSO)?;
    let seccion = self.require(c::SECCION)?;
    let asignatura = self.require(c::ASIGNATURA)?;
    let instructor = self.require(c::INSTRUCTOR)?;
    let sede_principal = self.require(c::SEDE_PRINCIPAL)?;
    let sede_curso = self.require(c::SEDE_CURSO)?;
    let modalidad = self.require(c::MODALIDAD)?;
    let tipo_curso = self.require(c::TIPO_CURSO)?;
    let nrc = self.require(c::NRC)?;

    let mut records = Vec::with_capacity(self.rows.len());
    let mut skipped = 0usize;

    for row in &self.rows {
      let parsed = (
        parse_key_int(cell(row, ano)),
        parse_key_int(cell(row, periodo)),
        parse_key_int(cell(row, seccion)),
        cell(row, nrc).trim().parse::<u32>().ok(),
        CourseType::from_label(cell(row, tipo_curso)),
      );
      let (Some(year), Some(term), Some(section), Some(nrc_value), Some(course_type)) = parsed
      else {
        skipped += 1;
        continue;
      };

      records.push(PlanningRecord {
        year,
        term,
        program_code: cell(row, codigo_carrera).trim().to_string(),
        program: cell(row, carrera).trim().to_string(),
        course_code: cell(row, codigo_curso).trim().to_string(),
        section,
        subject: cell(row, asignatura).trim().to_string(),
        instructor: cell(row, instructor).trim().to_string(),
        site: Site::from_label(cell(row, sede_principal)),
        course_site: CourseSite::from_label(cell(row, sede_curso)),
        modality: Modality::from_label(cell(row, modalidad)),
        course_type,
        nrc: nrc_value,
      });
    }

    Ok(ParsedRecords { records, skipped })
  }
}
