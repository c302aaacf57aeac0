//! Planning-table domain types.
//!
//! One [`PlanningRecord`] is one row of the enriched planning table: the raw
//! identifying columns coerced to fixed types, plus the derived columns
//! (site, course-site, modality, course-type, instructor) and the assigned
//! NRC. The wire labels on the enums are fixed — they appear verbatim in the
//! persisted CSV files and in JSON responses.

use serde::{Deserialize, Serialize};

// ─── Sites ───────────────────────────────────────────────────────────────────

/// Campus, derived from the program code via three fixed disjoint sets.
/// Program codes outside all three sets have no site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Site {
  #[serde(rename = "FCHB")]
  Fchb,
  #[serde(rename = "ABQ")]
  Abq,
  #[serde(rename = "IRQ")]
  Irq,
}

impl Site {
  pub fn as_str(self) -> &'static str {
    match self {
      Site::Fchb => "FCHB",
      Site::Abq => "ABQ",
      Site::Irq => "IRQ",
    }
  }

  /// Parse the fixed wire label back into a site.
  pub fn from_label(label: &str) -> Option<Self> {
    match label.trim() {
      "FCHB" => Some(Site::Fchb),
      "ABQ" => Some(Site::Abq),
      "IRQ" => Some(Site::Irq),
      _ => None,
    }
  }
}

/// The site a *course* is evaluated under. Normally the program's site;
/// employability subjects are pooled under a dedicated label instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseSite {
  #[serde(rename = "FCHB")]
  Fchb,
  #[serde(rename = "ABQ")]
  Abq,
  #[serde(rename = "IRQ")]
  Irq,
  #[serde(rename = "EMPLOYABILITY")]
  Employability,
}

impl CourseSite {
  pub fn as_str(self) -> &'static str {
    match self {
      CourseSite::Fchb => "FCHB",
      CourseSite::Abq => "ABQ",
      CourseSite::Irq => "IRQ",
      CourseSite::Employability => "EMPLOYABILITY",
    }
  }

  pub fn from_label(label: &str) -> Option<Self> {
    match label.trim() {
      "FCHB" => Some(CourseSite::Fchb),
      "ABQ" => Some(CourseSite::Abq),
      "IRQ" => Some(CourseSite::Irq),
      "EMPLOYABILITY" => Some(CourseSite::Employability),
      _ => None,
    }
  }
}

impl From<Site> for CourseSite {
  fn from(site: Site) -> Self {
    match site {
      Site::Fchb => CourseSite::Fchb,
      Site::Abq => CourseSite::Abq,
      Site::Irq => CourseSite::Irq,
    }
  }
}

// ─── Modality / course type ──────────────────────────────────────────────────

/// Teaching modality, derived from the raw `Periodo_Nivel` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
  #[serde(rename = "IN-PERSON")]
  InPerson,
  #[serde(rename = "VIRTUAL")]
  Virtual,
}

impl Modality {
  pub fn as_str(self) -> &'static str {
    match self {
      Modality::InPerson => "IN-PERSON",
      Modality::Virtual => "VIRTUAL",
    }
  }

  pub fn from_label(label: &str) -> Option<Self> {
    match label.trim() {
      "IN-PERSON" => Some(Modality::InPerson),
      "VIRTUAL" => Some(Modality::Virtual),
      _ => None,
    }
  }
}

/// Course classification; decides which evaluation form applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseType {
  #[serde(rename = "PROJECT")]
  Project,
  #[serde(rename = "THEORY-PRACTICE")]
  TheoryPractice,
}

impl CourseType {
  pub fn as_str(self) -> &'static str {
    match self {
      CourseType::Project => "PROJECT",
      CourseType::TheoryPractice => "THEORY-PRACTICE",
    }
  }

  pub fn from_label(label: &str) -> Option<Self> {
    match label.trim() {
      "PROJECT" => Some(CourseType::Project),
      "THEORY-PRACTICE" => Some(CourseType::TheoryPractice),
      _ => None,
    }
  }
}

// ─── Keys and records ────────────────────────────────────────────────────────

/// The five-part key that uniquely determines an NRC, stable across
/// re-processing runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey {
  pub year:         i32,
  pub term:         i32,
  pub program_code: String,
  pub course_code:  String,
  pub section:      i32,
}

/// One row of the enriched planning table, fully typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRecord {
  pub year:         i32,
  pub term:         i32,
  pub program_code: String,
  /// Display name; falls back to the program code when the raw table has no
  /// `Carrera` column.
  pub program:      String,
  pub course_code:  String,
  pub section:      i32,
  pub subject:      String,
  /// `"LASTNAME FIRSTNAME"`, derived from the two raw instructor columns.
  pub instructor:   String,
  pub site:         Option<Site>,
  pub course_site:  Option<CourseSite>,
  pub modality:     Option<Modality>,
  pub course_type:  CourseType,
  pub nrc:          u32,
}
