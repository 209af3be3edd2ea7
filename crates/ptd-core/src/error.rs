//! Error types for `ptd-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown application status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown species id: {0}")]
  UnknownSpecies(i32),

  #[error("unknown sex id: {0}")]
  UnknownSex(i32),

  #[error("unknown address type: {0:?}")]
  UnknownAddressType(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
