//! Audit columns shared by every persisted entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who created and last touched a row, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
  pub created_by: Option<Uuid>,
  pub created_on: DateTime<Utc>,
  pub updated_by: Option<Uuid>,
  pub updated_on: DateTime<Utc>,
}

impl Audit {
  /// A fresh audit block where creation and last update coincide.
  pub fn created(by: Option<Uuid>, at: DateTime<Utc>) -> Self {
    Self { created_by: by, created_on: at, updated_by: by, updated_on: at }
  }

  /// Record a modification.
  pub fn touch(&mut self, by: Option<Uuid>, at: DateTime<Utc>) {
    self.updated_by = by;
    self.updated_on = at;
  }
}
