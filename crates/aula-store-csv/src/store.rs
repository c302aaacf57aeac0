//! [`CsvStore`] — the CSV-file implementation of [`PlanningStore`].

use std::path::{Path, PathBuf};

use aula_core::{
  nrc::NrcLedger,
  results::EvaluationForm,
  store::PlanningStore,
  table::{EnrichedTable, RawTable},
};

use crate::{Error, Result};

const RAW_FILE: &str = "planificacion_academica.csv";
const PROCESSED_FILE: &str = "planificacion_academica_proc.csv";
const LEDGER_FILE: &str = "nrc_memoria.csv";
const RESULTS_PROJECT_FILE: &str = "evaluacion_docente_proc.csv";
const RESULTS_TP_FILE: &str = "evaluacion_docente_tp_proc.csv";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A planning store backed by CSV files under two directories: the raw
/// upload lives in `upload_dir`, everything the service produces in
/// `processed_dir`.
///
/// Cloning is cheap — the store holds only the two paths.
#[derive(Debug, Clone)]
pub struct CsvStore {
  upload_dir:    PathBuf,
  processed_dir: PathBuf,
}

impl CsvStore {
  /// Open a store over the two directories, creating them when absent.
  pub async fn open(
    upload_dir: impl Into<PathBuf>,
    processed_dir: impl Into<PathBuf>,
  ) -> Result<Self> {
    let store = Self {
      upload_dir:    upload_dir.into(),
      processed_dir: processed_dir.into(),
    };
    tokio::fs::create_dir_all(&store.upload_dir).await?;
    tokio::fs::create_dir_all(&store.processed_dir).await?;
    Ok(store)
  }

  pub fn raw_path(&self) -> PathBuf {
    self.upload_dir.join(RAW_FILE)
  }

  pub fn processed_path(&self) -> PathBuf {
    self.processed_dir.join(PROCESSED_FILE)
  }

  pub fn ledger_path(&self) -> PathBuf {
    self.processed_dir.join(LEDGER_FILE)
  }

  pub fn results_path(&self, form: EvaluationForm) -> PathBuf {
    let file = match form {
      EvaluationForm::Project => RESULTS_PROJECT_FILE,
      EvaluationForm::TheoryPractice => RESULTS_TP_FILE,
    };
    self.processed_dir.join(file)
  }

  // ── CSV plumbing ──────────────────────────────────────────────────────

  /// Read a sheet as header + rows; `None` when the file does not exist.
  async fn read_sheet(
    &self,
    path: &Path,
  ) -> Result<Option<(Vec<String>, Vec<Vec<String>>)>> {
    let bytes = match tokio::fs::read(path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };

    let mut reader = csv::ReaderBuilder::new()
      .flexible(true)
      .from_reader(bytes.as_slice());
    let headers: Vec<String> =
      reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
      let record = record?;
      rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Some((headers, rows)))
  }

  async fn write_sheet(
    &self,
    path: &Path,
    headers: &[String],
    rows: &[Vec<String>],
  ) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
      writer.write_record(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
  }
}

// ─── PlanningStore impl ──────────────────────────────────────────────────────

impl PlanningStore for CsvStore {
  type Error = Error;

  async fn load_raw(&self) -> Result<RawTable> {
    let path = self.raw_path();
    match self.read_sheet(&path).await? {
      Some((headers, rows)) => Ok(RawTable::new(headers, rows)),
      None => Err(Error::RawMissing(path)),
    }
  }

  async fn load_enriched(&self) -> Result<Option<EnrichedTable>> {
    Ok(
      self
        .read_sheet(&self.processed_path())
        .await?
        .map(|(headers, rows)| EnrichedTable { headers, rows }),
    )
  }

  async fn save_enriched(&self, table: &EnrichedTable) -> Result<()> {
    self
      .write_sheet(&self.processed_path(), &table.headers, &table.rows)
      .await
  }

  async fn load_ledger(&self) -> Result<NrcLedger> {
    match self.read_sheet(&self.ledger_path()).await? {
      Some((headers, rows)) => Ok(NrcLedger::from_rows(&headers, &rows)?),
      None => Ok(NrcLedger::new()),
    }
  }

  async fn save_ledger(&self, ledger: &NrcLedger) -> Result<()> {
    let (headers, rows) = ledger.to_rows();
    self.write_sheet(&self.ledger_path(), &headers, &rows).await
  }

  async fn append_result(
    &self,
    form: EvaluationForm,
    row: &[String],
  ) -> Result<()> {
    let path = self.results_path(form);
    let (headers, mut rows) =
      self.read_sheet(&path).await?.unwrap_or_else(|| {
        let schema =
          form.schema().iter().map(|c| c.to_string()).collect();
        (schema, Vec::new())
      });

    rows.push(row.to_vec());
    self.write_sheet(&path, &headers, &rows).await
  }
}
