//! NRC assignment — the persisted key → identifier ledger.
//!
//! Identifiers are never reused and never decrease: a previously seen
//! [`SectionKey`] keeps its NRC forever, a new key gets `max(existing) + 1`
//! in the order keys are first encountered while scanning the table top to
//! bottom. The whole ledger is rewritten after every preparation run.

use std::collections::HashMap;

use crate::{
  Error, Result,
  record::SectionKey,
  table::{cell, columns, parse_key_int},
};

/// Assignment starts above this seed; the first NRC ever handed out is 1000.
pub const NRC_SEED: u32 = 999;

/// Persisted columns of the ledger spreadsheet, in order.
pub const LEDGER_COLUMNS: [&str; 6] = [
  columns::ANO,
  columns::PERIODO,
  columns::CODIGO_CARRERA,
  columns::CODIGO_CURSO,
  columns::SECCION,
  columns::NRC,
];

#[derive(Debug, Clone, Default)]
pub struct NrcLedger {
  entries: HashMap<SectionKey, u32>,
  next:    u32,
}

impl NrcLedger {
  pub fn new() -> Self {
    Self { entries: HashMap::new(), next: NRC_SEED + 1 }
  }

  /// Return the NRC for `key`, assigning the next unused identifier when the
  /// key has not been seen before.
  pub fn assign(&mut self, key: &SectionKey) -> u32 {
    if let Some(&nrc) = self.entries.get(key) {
      return nrc;
    }
    let nrc = self.next;
    self.next += 1;
    self.entries.insert(key.clone(), nrc);
    nrc
  }

  pub fn get(&self, key: &SectionKey) -> Option<u32> {
    self.entries.get(key).copied()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  // ── Tabular form (persisted layout) ───────────────────────────────────

  /// Serialise to header + rows, sorted by NRC so re-runs produce identical
  /// files.
  pub fn to_rows(&self) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = LEDGER_COLUMNS.iter().map(|c| c.to_string()).collect();

    let mut entries: Vec<(&SectionKey, u32)> =
      self.entries.iter().map(|(k, &v)| (k, v)).collect();
    entries.sort_by_key(|&(_, nrc)| nrc);

    let rows = entries
      .into_iter()
      .map(|(key, nrc)| {
        vec![
          key.year.to_string(),
          key.term.to_string(),
          key.program_code.clone(),
          key.course_code.clone(),
          key.section.to_string(),
          nrc.to_string(),
        ]
      })
      .collect();

    (headers, rows)
  }

  /// Rebuild a ledger from its persisted tabular form.
  ///
  /// A malformed ledger aborts the whole load — silently dropping ledger rows
  /// could hand an already-used NRC to a new key.
  pub fn from_rows(headers: &[String], rows: &[Vec<String>]) -> Result<Self> {
    let col = |name: &'static str| -> Result<usize> {
      headers
        .iter()
        .position(|h| h == name)
        .ok_or(Error::MissingColumn(name))
    };

    let ano = col(columns::ANO)?;
    let periodo = col(columns::PERIODO)?;
    let codigo_carrera = col(columns::CODIGO_CARRERA)?;
    let codigo_curso = col(columns::CODIGO_CURSO)?;
    let seccion = col(columns::SECCION)?;
    let nrc_col = col(columns::NRC)?;

    let bad = |column: &'static str, row: usize, value: &str| Error::BadCell {
      column,
      row,
      value: value.to_string(),
    };

    let mut ledger = Self::new();
    for (i, row) in rows.iter().enumerate() {
      let year = parse_key_int(cell(row, ano))
        .ok_or_else(|| bad(columns::ANO, i, cell(row, ano)))?;
      let term = parse_key_int(cell(row, periodo))
        .ok_or_else(|| bad(columns::PERIODO, i, cell(row, periodo)))?;
      let section = parse_key_int(cell(row, seccion))
        .ok_or_else(|| bad(columns::SECCION, i, cell(row, seccion)))?;
      let nrc: u32 = cell(row, nrc_col)
        .trim()
        .parse()
        .map_err(|_| bad(columns::NRC, i, cell(row, nrc_col)))?;

      let key = SectionKey {
        year,
        term,
        program_code: cell(row, codigo_carrera).trim().to_string(),
        course_code: cell(row, codigo_curso).trim().to_string(),
        section,
      };

      if ledger.entries.insert(key, nrc).is_some() {
        return Err(Error::DuplicateLedgerKey(nrc));
      }
      if nrc >= ledger.next {
        ledger.next = nrc + 1;
      }
    }

    Ok(ledger)
  }
}
