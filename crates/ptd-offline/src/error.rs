//! Error types for the offline ingestion workflow.

use thiserror::Error;

/// The failure surfaced to callers of
/// [`OfflineApplicationService::process`](crate::OfflineApplicationService::process).
#[derive(Debug, Error)]
pub enum ProcessingError {
  /// The payload did not pass validation; nothing was written.
  /// Carries every `Field: Message` pair, comma-separated.
  #[error("Validation failed: {0}")]
  Validation(String),

  /// Validation passed but the write sequence failed; nothing was written.
  #[error("Failed to process application {reference}: {source}")]
  Failed {
    reference: String,
    #[source]
    source:    IngestError,
  },
}

impl ProcessingError {
  pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }
}

/// What went wrong inside the write sequence.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("Invalid breed id: {0}")]
  InvalidBreed(i32),

  #[error("Invalid contact id: {0:?}")]
  InvalidContactId(String),

  #[error("{0} details are missing")]
  MissingSection(&'static str),

  #[error("{0} is missing")]
  MissingField(&'static str),

  #[error(transparent)]
  Core(#[from] ptd_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IngestError {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}
