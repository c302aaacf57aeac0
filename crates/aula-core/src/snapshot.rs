//! The immutable in-memory table and its cascade queries.
//!
//! A [`TableSnapshot`] is built once per load and never mutated; callers hold
//! it behind an `Arc` and replace the whole reference on reload. Every query
//! is an exact-match conjunctive filter, with results sorted and
//! deduplicated: the cascade
//! years → terms → sites → programs → sections → subjects → instructors
//! narrows one level per call.

use std::collections::BTreeSet;

use crate::record::{CourseSite, CourseType, PlanningRecord, Site};

/// Placeholder instructor names that mark an unassigned section; they never
/// surface in the instructor level of the cascade.
pub const EXCLUDED_INSTRUCTORS: [&str; 10] = [
  "LIM EOM AS INSTRUCTOR",
  "LIM PM AS INSTRUCTOR",
  "LIM SI AS INSTRUCTOR",
  "LIM MMP AS INSTRUCTOR",
  "LIM MSEII AS INSTRUCTOR",
  "AQP EOM AS INSTRUCTOR",
  "AQP SI AS INSTRUCTOR",
  "AQP PM AS INSTRUCTOR",
  "AQP MMP AS INSTRUCTOR",
  "AQP MSEII AS INSTRUCTOR",
];

// ─── Queries ─────────────────────────────────────────────────────────────────

/// The fully specified filter set of the terminal cascade step.
#[derive(Debug, Clone)]
pub struct SectionQuery {
  pub year:       i32,
  pub term:       i32,
  pub site:       Site,
  pub program:    String,
  pub section:    i32,
  pub subject:    String,
  pub instructor: String,
}

/// The terminal lookup result: the NRC and the site the course is evaluated
/// under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NrcMatch {
  pub nrc:         u32,
  pub course_site: Option<CourseSite>,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// An immutable, fully-typed copy of the enriched planning table.
#[derive(Debug, Default)]
pub struct TableSnapshot {
  records: Vec<PlanningRecord>,
}

impl TableSnapshot {
  pub fn new(records: Vec<PlanningRecord>) -> Self {
    Self { records }
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  // ── Cascade levels ────────────────────────────────────────────────────

  pub fn years(&self) -> Vec<i32> {
    sorted(self.records.iter().map(|r| r.year))
  }

  pub fn terms(&self, year: i32) -> Vec<i32> {
    sorted(
      self
        .records
        .iter()
        .filter(|r| r.year == year)
        .map(|r| r.term),
    )
  }

  /// Sites with at least one row under `(year, term)`, sorted by their wire
  /// label. Rows whose program code maps to no site are invisible here and
  /// below.
  pub fn sites(&self, year: i32, term: i32) -> Vec<Site> {
    let mut sites = sorted(
      self
        .records
        .iter()
        .filter(|r| r.year == year && r.term == term)
        .filter_map(|r| r.site),
    );
    sites.sort_by_key(|s| s.as_str());
    sites
  }

  pub fn programs(&self, year: i32, term: i32, site: Site) -> Vec<String> {
    sorted(
      self
        .records
        .iter()
        .filter(|r| r.year == year && r.term == term && r.site == Some(site))
        .map(|r| r.program.clone()),
    )
  }

  pub fn sections(
    &self,
    year: i32,
    term: i32,
    site: Site,
    program: &str,
  ) -> Vec<i32> {
    sorted(
      self
        .records
        .iter()
        .filter(|r| {
          r.year == year
            && r.term == term
            && r.site == Some(site)
            && r.program == program
        })
        .map(|r| r.section),
    )
  }

  pub fn subjects(
    &self,
    year: i32,
    term: i32,
    site: Site,
    program: &str,
    section: i32,
  ) -> Vec<String> {
    sorted(
      self
        .records
        .iter()
        .filter(|r| {
          r.year == year
            && r.term == term
            && r.site == Some(site)
            && r.program == program
            && r.section == section
        })
        .map(|r| r.subject.clone()),
    )
  }

  pub fn instructors(
    &self,
    year: i32,
    term: i32,
    site: Site,
    program: &str,
    section: i32,
    subject: &str,
  ) -> Vec<String> {
    sorted(
      self
        .records
        .iter()
        .filter(|r| {
          r.year == year
            && r.term == term
            && r.site == Some(site)
            && r.program == program
            && r.section == section
            && r.subject == subject
        })
        .map(|r| r.instructor.clone())
        .filter(|i| !EXCLUDED_INSTRUCTORS.contains(&i.as_str())),
    )
  }

  // ── Terminal lookups ──────────────────────────────────────────────────

  /// First row (in stored order) matching all seven filters.
  pub fn resolve_nrc(&self, query: &SectionQuery) -> Option<NrcMatch> {
    self
      .records
      .iter()
      .find(|r| {
        r.year == query.year
          && r.term == query.term
          && r.site == Some(query.site)
          && r.program == query.program
          && r.section == query.section
          && r.subject == query.subject
          && r.instructor == query.instructor
      })
      .map(|r| NrcMatch { nrc: r.nrc, course_site: r.course_site })
  }

  /// Exact match on the NRC's string form.
  pub fn course_type_for(&self, nrc: &str) -> Option<CourseType> {
    let nrc = nrc.trim();
    self
      .records
      .iter()
      .find(|r| r.nrc.to_string() == nrc)
      .map(|r| r.course_type)
  }
}

fn sorted<T: Ord>(values: impl Iterator<Item = T>) -> Vec<T> {
  values.collect::<BTreeSet<T>>().into_iter().collect()
}
