//! The registered keeper of a pet.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::Audit;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
  pub id:           Uuid,
  pub full_name:    String,
  pub email:        String,
  pub telephone:    Option<String>,
  pub address_id:   Uuid,
  pub owner_type:   Option<String>,
  pub charity_name: Option<String>,
  pub audit:        Audit,
}
