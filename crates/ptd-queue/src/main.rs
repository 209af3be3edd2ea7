//! ptd-worker binary.
//!
//! Reads `ptd-worker.toml` (or the path given with `--config`), opens the
//! SQLite store, optionally seeds reference data, and drains newline-delimited
//! queue messages from `--input` (or stdin). Failed messages are appended to
//! the dead-letter file as JSON lines.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use ptd_core::reference::ReferenceDataSet;
use ptd_offline::{MappingValidator, OfflineApplicationService};
use ptd_queue::{MessageProcessor, WorkerConfig, drain};
use ptd_store_sqlite::SqliteStore;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Pet travel document queue worker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "ptd-worker.toml")]
  config: PathBuf,

  /// Newline-delimited messages to process. Reads stdin when omitted.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Dead-letter file; overrides `dead_letter_path` from the config.
  #[arg(long)]
  dead_letter: Option<PathBuf>,
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
    .add_source(config::Environment::with_prefix("PTD"))
    .build()
    .context("failed to read config file")?;

  let worker_cfg: WorkerConfig = settings
    .try_deserialize()
    .context("failed to deserialise WorkerConfig")?;

  let store_path = expand_tilde(&worker_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(path) = &worker_cfg.reference_data_path {
    let path = expand_tilde(path);
    let raw = tokio::fs::read_to_string(&path)
      .await
      .with_context(|| format!("failed to read reference data at {path:?}"))?;
    let data = ReferenceDataSet::from_json(&raw).context("failed to parse reference data")?;
    store
      .seed_reference_data(data)
      .await
      .context("failed to seed reference data")?;
  }

  let store = Arc::new(store);
  let validator = MappingValidator::with_config(Arc::clone(&store), worker_cfg.validator_config());
  let processor = MessageProcessor::new(OfflineApplicationService::new(store, validator));

  let input: Box<dyn AsyncBufRead + Unpin> = match &cli.input {
    Some(path) => Box::new(BufReader::new(
      tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open input {path:?}"))?,
    )),
    None => Box::new(BufReader::new(tokio::io::stdin())),
  };

  let mut dead_letter: Box<dyn AsyncWrite + Unpin> =
    match cli.dead_letter.as_ref().or(worker_cfg.dead_letter_path.as_ref()) {
      Some(path) => {
        let path = expand_tilde(path);
        Box::new(
          tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("failed to open dead-letter file {path:?}"))?,
        )
      }
      None => Box::new(tokio::io::stderr()),
    };

  let summary = drain(&processor, input, &mut dead_letter)
    .await
    .context("failed to drain messages")?;

  tracing::info!(processed = summary.processed, failed = summary.failed, "drain finished");
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
