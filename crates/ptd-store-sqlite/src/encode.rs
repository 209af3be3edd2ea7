//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as fixed-width RFC 3339 strings (microseconds,
//! `Z` suffix) so that text order is time order. UUIDs are stored as
//! hyphenated lowercase strings. Enumerations are stored as their wire
//! strings (status, address type) or integer ids (species, sex).

use std::str::FromStr as _;

use chrono::{DateTime, SecondsFormat, Utc};
use ptd_core::{
  address::{Address, AddressType},
  application::{Application, ApplicationStatus},
  audit::Audit,
  owner::Owner,
  pet::{Pet, Sex, Species},
  reference::{Breed, Colour},
  travel_document::TravelDocument,
  user::User,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn encode_opt_uuid(id: Option<Uuid>) -> Option<String> { id.map(encode_uuid) }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn encode_opt_dt(dt: Option<DateTime<Utc>>) -> Option<String> { dt.map(encode_dt) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

pub fn decode_address_type(s: &str) -> Result<AddressType> {
  AddressType::from_str(s)
    .map_err(|_| Error::Core(ptd_core::Error::UnknownAddressType(s.to_owned())))
}

// ─── Audit ───────────────────────────────────────────────────────────────────

pub struct EncodedAudit {
  pub created_by: Option<String>,
  pub created_on: String,
  pub updated_by: Option<String>,
  pub updated_on: String,
}

pub fn encode_audit(audit: &Audit) -> EncodedAudit {
  EncodedAudit {
    created_by: encode_opt_uuid(audit.created_by),
    created_on: encode_dt(audit.created_on),
    updated_by: encode_opt_uuid(audit.updated_by),
    updated_on: encode_dt(audit.updated_on),
  }
}

/// The four audit columns, always selected last and in this order.
pub struct RawAudit {
  created_by: Option<String>,
  created_on: String,
  updated_by: Option<String>,
  updated_on: String,
}

impl RawAudit {
  fn from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      created_by: row.get(start)?,
      created_on: row.get(start + 1)?,
      updated_by: row.get(start + 2)?,
      updated_on: row.get(start + 3)?,
    })
  }

  fn into_audit(self) -> Result<Audit> {
    Ok(Audit {
      created_by: decode_opt_uuid(self.created_by)?,
      created_on: decode_dt(&self.created_on)?,
      updated_by: decode_opt_uuid(self.updated_by)?,
      updated_on: decode_dt(&self.updated_on)?,
    })
  }
}

// ─── Reference data ──────────────────────────────────────────────────────────

pub fn breed_from_row(row: &Row<'_>) -> rusqlite::Result<Breed> {
  Ok(Breed { id: row.get(0)?, name: row.get(1)?, species_id: row.get(2)? })
}

pub fn colour_from_row(row: &Row<'_>) -> rusqlite::Result<Colour> {
  Ok(Colour { id: row.get(0)?, name: row.get(1)? })
}

// ─── Addresses ───────────────────────────────────────────────────────────────

pub const ADDRESS_COLUMNS: &str = "address_id, address_line_one, address_line_two, \
  town_or_city, county, post_code, country, address_type, is_active, \
  created_by, created_on, updated_by, updated_on";

pub struct RawAddress {
  address_id:       String,
  address_line_one: String,
  address_line_two: Option<String>,
  town_or_city:     String,
  county:           Option<String>,
  post_code:        String,
  country:          Option<String>,
  address_type:     String,
  is_active:        bool,
  audit:            RawAudit,
}

impl RawAddress {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      address_id:       row.get(0)?,
      address_line_one: row.get(1)?,
      address_line_two: row.get(2)?,
      town_or_city:     row.get(3)?,
      county:           row.get(4)?,
      post_code:        row.get(5)?,
      country:          row.get(6)?,
      address_type:     row.get(7)?,
      is_active:        row.get(8)?,
      audit:            RawAudit::from_row(row, 9)?,
    })
  }

  pub fn into_address(self) -> Result<Address> {
    Ok(Address {
      id:               decode_uuid(&self.address_id)?,
      address_line_one: self.address_line_one,
      address_line_two: self.address_line_two,
      town_or_city:     self.town_or_city,
      county:           self.county,
      post_code:        self.post_code,
      country:          self.country,
      address_type:     decode_address_type(&self.address_type)?,
      is_active:        self.is_active,
      audit:            self.audit.into_audit()?,
    })
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, full_name, first_name, last_name, email, \
  telephone, contact_id, address_id, role, \
  created_by, created_on, updated_by, updated_on";

pub struct RawUser {
  user_id:    String,
  full_name:  String,
  first_name: Option<String>,
  last_name:  Option<String>,
  email:      String,
  telephone:  Option<String>,
  contact_id: Option<String>,
  address_id: Option<String>,
  role:       Option<String>,
  audit:      RawAudit,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      full_name:  row.get(1)?,
      first_name: row.get(2)?,
      last_name:  row.get(3)?,
      email:      row.get(4)?,
      telephone:  row.get(5)?,
      contact_id: row.get(6)?,
      address_id: row.get(7)?,
      role:       row.get(8)?,
      audit:      RawAudit::from_row(row, 9)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         decode_uuid(&self.user_id)?,
      full_name:  self.full_name,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      telephone:  self.telephone,
      contact_id: decode_opt_uuid(self.contact_id)?,
      address_id: decode_opt_uuid(self.address_id)?,
      role:       self.role,
      audit:      self.audit.into_audit()?,
    })
  }
}

// ─── Owners ──────────────────────────────────────────────────────────────────

pub const OWNER_COLUMNS: &str = "owner_id, full_name, email, telephone, address_id, \
  owner_type, charity_name, created_by, created_on, updated_by, updated_on";

pub struct RawOwner {
  owner_id:     String,
  full_name:    String,
  email:        String,
  telephone:    Option<String>,
  address_id:   String,
  owner_type:   Option<String>,
  charity_name: Option<String>,
  audit:        RawAudit,
}

impl RawOwner {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      owner_id:     row.get(0)?,
      full_name:    row.get(1)?,
      email:        row.get(2)?,
      telephone:    row.get(3)?,
      address_id:   row.get(4)?,
      owner_type:   row.get(5)?,
      charity_name: row.get(6)?,
      audit:        RawAudit::from_row(row, 7)?,
    })
  }

  pub fn into_owner(self) -> Result<Owner> {
    Ok(Owner {
      id:           decode_uuid(&self.owner_id)?,
      full_name:    self.full_name,
      email:        self.email,
      telephone:    self.telephone,
      address_id:   decode_uuid(&self.address_id)?,
      owner_type:   self.owner_type,
      charity_name: self.charity_name,
      audit:        self.audit.into_audit()?,
    })
  }
}

// ─── Pets ────────────────────────────────────────────────────────────────────

pub const PET_COLUMNS: &str = "pet_id, name, species_id, breed_id, \
  additional_info_mixed_breed_or_unknown, sex_id, date_of_birth, colour_id, \
  other_colour, microchip_number, microchipped_date, has_unique_feature, \
  unique_feature_description, created_by, created_on, updated_by, updated_on";

pub struct RawPet {
  pet_id:                                 String,
  name:                                   String,
  species_id:                             i32,
  breed_id:                               Option<i32>,
  additional_info_mixed_breed_or_unknown: Option<String>,
  sex_id:                                 i32,
  date_of_birth:                          Option<String>,
  colour_id:                              i32,
  other_colour:                           Option<String>,
  microchip_number:                       Option<String>,
  microchipped_date:                      Option<String>,
  has_unique_feature:                     bool,
  unique_feature_description:             Option<String>,
  audit:                                  RawAudit,
}

impl RawPet {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      pet_id:                                 row.get(0)?,
      name:                                   row.get(1)?,
      species_id:                             row.get(2)?,
      breed_id:                               row.get(3)?,
      additional_info_mixed_breed_or_unknown: row.get(4)?,
      sex_id:                                 row.get(5)?,
      date_of_birth:                          row.get(6)?,
      colour_id:                              row.get(7)?,
      other_colour:                           row.get(8)?,
      microchip_number:                       row.get(9)?,
      microchipped_date:                      row.get(10)?,
      has_unique_feature:                     row.get(11)?,
      unique_feature_description:             row.get(12)?,
      audit:                                  RawAudit::from_row(row, 13)?,
    })
  }

  pub fn into_pet(self) -> Result<Pet> {
    Ok(Pet {
      id:                                     decode_uuid(&self.pet_id)?,
      name:                                   self.name,
      species:                                Species::try_from_id(self.species_id)?,
      breed_id:                               self.breed_id,
      additional_info_mixed_breed_or_unknown: self.additional_info_mixed_breed_or_unknown,
      sex:                                    Sex::try_from_id(self.sex_id)?,
      date_of_birth:                          decode_opt_dt(self.date_of_birth)?,
      colour_id:                              self.colour_id,
      other_colour:                           self.other_colour,
      microchip_number:                       self.microchip_number,
      microchipped_date:                      decode_opt_dt(self.microchipped_date)?,
      has_unique_feature:                     self.has_unique_feature,
      unique_feature_description:             self.unique_feature_description,
      audit:                                  self.audit.into_audit()?,
    })
  }
}

// ─── Applications ────────────────────────────────────────────────────────────

pub const APPLICATION_COLUMNS: &str = "application_id, pet_id, owner_id, user_id, \
  owner_address_id, owner_full_name, owner_phone_number, reference_number, \
  date_of_application, status, dynamic_id, date_authorised, date_rejected, \
  date_revoked, date_suspended, date_unsuspended, \
  created_by, created_on, updated_by, updated_on";

pub struct RawApplication {
  application_id:      String,
  pet_id:              String,
  owner_id:            String,
  user_id:             String,
  owner_address_id:    String,
  owner_full_name:     String,
  owner_phone_number:  Option<String>,
  reference_number:    String,
  date_of_application: String,
  status:              String,
  dynamic_id:          Option<String>,
  date_authorised:     Option<String>,
  date_rejected:       Option<String>,
  date_revoked:        Option<String>,
  date_suspended:      Option<String>,
  date_unsuspended:    Option<String>,
  audit:               RawAudit,
}

impl RawApplication {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application_id:      row.get(0)?,
      pet_id:              row.get(1)?,
      owner_id:            row.get(2)?,
      user_id:             row.get(3)?,
      owner_address_id:    row.get(4)?,
      owner_full_name:     row.get(5)?,
      owner_phone_number:  row.get(6)?,
      reference_number:    row.get(7)?,
      date_of_application: row.get(8)?,
      status:              row.get(9)?,
      dynamic_id:          row.get(10)?,
      date_authorised:     row.get(11)?,
      date_rejected:       row.get(12)?,
      date_revoked:        row.get(13)?,
      date_suspended:      row.get(14)?,
      date_unsuspended:    row.get(15)?,
      audit:               RawAudit::from_row(row, 16)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      id:                  decode_uuid(&self.application_id)?,
      pet_id:              decode_uuid(&self.pet_id)?,
      owner_id:            decode_uuid(&self.owner_id)?,
      user_id:             decode_uuid(&self.user_id)?,
      owner_address_id:    decode_uuid(&self.owner_address_id)?,
      owner_full_name:     self.owner_full_name,
      owner_phone_number:  self.owner_phone_number,
      reference_number:    self.reference_number,
      date_of_application: decode_dt(&self.date_of_application)?,
      status:              ApplicationStatus::parse(&self.status)?,
      dynamic_id:          decode_opt_uuid(self.dynamic_id)?,
      date_authorised:     decode_opt_dt(self.date_authorised)?,
      date_rejected:       decode_opt_dt(self.date_rejected)?,
      date_revoked:        decode_opt_dt(self.date_revoked)?,
      date_suspended:      decode_opt_dt(self.date_suspended)?,
      date_unsuspended:    decode_opt_dt(self.date_unsuspended)?,
      audit:               self.audit.into_audit()?,
    })
  }
}

// ─── Travel documents ────────────────────────────────────────────────────────

pub const TRAVEL_DOCUMENT_COLUMNS: &str = "travel_document_id, application_id, \
  owner_id, pet_id, document_reference_number, qr_code, is_life_time, \
  valid_from, valid_to, created_by, created_on, updated_by, updated_on";

pub struct RawTravelDocument {
  travel_document_id:        String,
  application_id:            String,
  owner_id:                  String,
  pet_id:                    String,
  document_reference_number: String,
  qr_code:                   Option<String>,
  is_life_time:              bool,
  valid_from:                Option<String>,
  valid_to:                  Option<String>,
  audit:                     RawAudit,
}

impl RawTravelDocument {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      travel_document_id:        row.get(0)?,
      application_id:            row.get(1)?,
      owner_id:                  row.get(2)?,
      pet_id:                    row.get(3)?,
      document_reference_number: row.get(4)?,
      qr_code:                   row.get(5)?,
      is_life_time:              row.get(6)?,
      valid_from:                row.get(7)?,
      valid_to:                  row.get(8)?,
      audit:                     RawAudit::from_row(row, 9)?,
    })
  }

  pub fn into_travel_document(self) -> Result<TravelDocument> {
    Ok(TravelDocument {
      id:                        decode_uuid(&self.travel_document_id)?,
      application_id:            decode_uuid(&self.application_id)?,
      owner_id:                  decode_uuid(&self.owner_id)?,
      pet_id:                    decode_uuid(&self.pet_id)?,
      document_reference_number: self.document_reference_number,
      qr_code:                   self.qr_code,
      is_life_time:              self.is_life_time,
      valid_from:                decode_opt_dt(self.valid_from)?,
      valid_to:                  decode_opt_dt(self.valid_to)?,
      audit:                     self.audit.into_audit()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn encoded_timestamps_sort_in_time_order() {
    let whole = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let times = [
      whole,
      whole + chrono::Duration::microseconds(1),
      whole + chrono::Duration::milliseconds(500),
      whole + chrono::Duration::seconds(1),
    ];

    let encoded: Vec<String> = times.iter().copied().map(encode_dt).collect();
    assert!(encoded.iter().all(|e| e.len() == encoded[0].len()));
    assert!(encoded.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(encoded[0], "2024-05-01T09:30:00.000000Z");

    for (text, time) in encoded.iter().zip(times) {
      assert_eq!(decode_dt(text).unwrap(), time);
    }
  }
}
