//! Pet travel documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::Audit;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDocument {
  pub id:                        Uuid,
  pub application_id:            Uuid,
  pub owner_id:                  Uuid,
  pub pet_id:                    Uuid,
  /// Equal to the owning application's reference number.
  pub document_reference_number: String,
  pub qr_code:                   Option<String>,
  pub is_life_time:              bool,
  pub valid_from:                Option<DateTime<Utc>>,
  pub valid_to:                  Option<DateTime<Utc>>,
  pub audit:                     Audit,
}
