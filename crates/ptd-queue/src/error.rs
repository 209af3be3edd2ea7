//! Error types for the queue adapter.

use ptd_offline::ProcessingError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum QueueError {
  /// The message could not be decoded. Kept apart from business validation
  /// failures, which arrive as [`QueueError::Processing`].
  #[error("Invalid message format: {0}")]
  InvalidMessageFormat(String),

  #[error(transparent)]
  Processing(#[from] ProcessingError),

  /// Unknown status string and similar boundary decoding failures.
  #[error(transparent)]
  Core(#[from] ptd_core::Error),

  #[error("No application found for dynamic id {0}")]
  ApplicationNotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to encode dead letter: {0}")]
  DeadLetter(#[source] serde_json::Error),
}

impl QueueError {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = QueueError> = std::result::Result<T, E>;
