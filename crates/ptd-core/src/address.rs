//! Postal addresses for owners and applicants.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::audit::Audit;

/// Which party an address row was written for.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
)]
pub enum AddressType {
  Owner,
  User,
}

/// A persisted address. Referenced by owners, users, and applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub id:               Uuid,
  pub address_line_one: String,
  pub address_line_two: Option<String>,
  pub town_or_city:     String,
  pub county:           Option<String>,
  pub post_code:        String,
  pub country:          Option<String>,
  pub address_type:     AddressType,
  pub is_active:        bool,
  pub audit:            Audit,
}
