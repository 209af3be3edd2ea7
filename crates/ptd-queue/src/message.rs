//! The queue envelope and its bodies.

use chrono::{DateTime, Utc};
use ptd_core::offline::OfflineApplication;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QueueError, Result};

/// One inbound message: `{"type": "<kind>", "body": <payload>}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum QueueMessage {
  /// A denormalized offline application. `null` bodies are passed through so
  /// the validator can report them.
  OfflineApplication(Option<OfflineApplication>),
  /// A CRM-side status change for an existing application.
  ApplicationStatus(ApplicationStatusUpdate),
}

impl QueueMessage {
  pub fn decode(raw: &str) -> Result<Self> {
    serde_json::from_str(raw).map_err(|e| QueueError::InvalidMessageFormat(e.to_string()))
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationStatusUpdate {
  pub dynamic_id:  Uuid,
  /// Wire form, e.g. `"Suspended"`. Parsed when the message is handled.
  pub status:      String,
  /// When the change happened in the CRM; defaults to receipt time.
  #[serde(default)]
  pub status_date: Option<DateTime<Utc>>,
}
