//! Aula server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! CSV planning store, runs the startup load, and serves the JSON API over
//! HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use aula_api::{AppState, ServerConfig, SnapshotHolder, reload};
use aula_store_csv::CsvStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Aula NRC lookup and evaluation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AULA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the CSV store (creates the directories when absent).
  let store = CsvStore::open(
    server_cfg.upload_dir.clone(),
    server_cfg.processed_dir.clone(),
  )
  .await
  .with_context(|| {
    format!(
      "failed to open store at {:?} / {:?}",
      server_cfg.upload_dir, server_cfg.processed_dir
    )
  })?;

  // Build application state and attempt the startup load. A failed load is
  // logged, not fatal — the service starts unloaded and can be filled via
  // /load_data.
  let state = AppState {
    store: Arc::new(store),
    table: Arc::new(SnapshotHolder::new()),
  };
  reload::bootstrap(&state).await;

  let app = aula_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
