//! The applicant who submitted an application.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::Audit;

/// One row per distinct applicant email. Repeat applicants reuse their row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         Uuid,
  pub full_name:  String,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      String,
  pub telephone:  Option<String>,
  /// CRM contact correlation id.
  pub contact_id: Option<Uuid>,
  pub address_id: Option<Uuid>,
  pub role:       Option<String>,
  pub audit:      Audit,
}
