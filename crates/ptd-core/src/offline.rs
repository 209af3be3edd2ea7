//! The denormalized payload of an offline (assisted-digital) application.
//!
//! Every field is raw, exactly as received on the queue: nothing is trimmed,
//! truncated, or parsed beyond what JSON decoding requires. The validator
//! runs on these values; the ingestion workflow maps them into entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OfflineApplication {
  pub owner_address:     Option<OfflineAddress>,
  /// Only written when it differs from `owner_address`.
  pub applicant_address: Option<OfflineAddress>,
  pub owner:             Option<OfflineOwner>,
  pub applicant:         Option<OfflineApplicant>,
  pub pet:               Option<OfflinePet>,
  pub application:       Option<OfflineApplicationDetails>,
  pub ptd:               Option<OfflineTravelDocument>,
  pub created_by:        Option<Uuid>,
}

impl OfflineApplication {
  /// The application reference number, if one was supplied.
  pub fn reference_number(&self) -> Option<&str> {
    self
      .application
      .as_ref()
      .and_then(|a| a.reference_number.as_deref())
  }

  pub fn document_reference_number(&self) -> Option<&str> {
    self
      .ptd
      .as_ref()
      .and_then(|p| p.document_reference_number.as_deref())
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OfflineAddress {
  pub address_line_one: Option<String>,
  pub address_line_two: Option<String>,
  pub town_or_city:     Option<String>,
  pub county:           Option<String>,
  pub post_code:        Option<String>,
}

impl OfflineAddress {
  /// Whether two addresses describe the same place, ignoring surrounding
  /// whitespace and letter case.
  pub fn same_location(&self, other: &Self) -> bool {
    fn norm(v: &Option<String>) -> String {
      v.as_deref().unwrap_or_default().trim().to_lowercase()
    }

    norm(&self.address_line_one) == norm(&other.address_line_one)
      && norm(&self.address_line_two) == norm(&other.address_line_two)
      && norm(&self.town_or_city) == norm(&other.town_or_city)
      && norm(&self.county) == norm(&other.county)
      && norm(&self.post_code) == norm(&other.post_code)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OfflineOwner {
  pub full_name: Option<String>,
  pub email:     Option<String>,
  pub telephone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OfflineApplicant {
  pub full_name:  Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub telephone:  Option<String>,
  /// CRM contact id as text; may carry stray whitespace.
  pub contact_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OfflinePet {
  pub name:                                   Option<String>,
  pub species_id:                             Option<i32>,
  pub breed_id:                               Option<i32>,
  pub additional_info_mixed_breed_or_unknown: Option<String>,
  pub sex_id:                                 Option<i32>,
  pub date_of_birth:                          Option<DateTime<Utc>>,
  pub colour_id:                              Option<i32>,
  pub other_colour:                           Option<String>,
  pub microchip_number:                       Option<String>,
  pub microchipped_date:                      Option<DateTime<Utc>>,
  pub has_unique_feature:                     Option<bool>,
  pub unique_feature_description:             Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OfflineApplicationDetails {
  pub reference_number:    Option<String>,
  pub date_of_application: Option<DateTime<Utc>>,
  /// Wire form of the status; only `"Authorised"` is accepted here.
  pub status:              Option<String>,
  pub date_authorised:     Option<DateTime<Utc>>,
  /// CRM record id as text.
  pub dynamic_id:          Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OfflineTravelDocument {
  pub document_reference_number: Option<String>,
}
