//! Payload-to-entity mapping.
//!
//! Pure functions: no I/O, no clock. Every free-text field is truncated to
//! its column limit here, whether or not validation already bounded it.

use ptd_core::{
  address::{Address, AddressType},
  application::{Application, ApplicationStatus},
  audit::Audit,
  limits::{self, truncate, truncate_opt},
  offline::{
    OfflineAddress, OfflineApplicant, OfflineApplicationDetails, OfflineOwner,
    OfflinePet, OfflineTravelDocument,
  },
  owner::Owner,
  pet::{Pet, Sex, Species, is_breed_sentinel, requires_other_colour},
  travel_document::TravelDocument,
  user::User,
};
use uuid::Uuid;

use crate::error::IngestError;

/// Address line two sometimes arrives as the literal text `NULL`.
const NULL_LITERAL: &str = "NULL";

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, IngestError> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or(IngestError::MissingField(field))
}

fn optional(value: Option<&str>, max: usize) -> Option<String> {
  truncate_opt(value.filter(|v| !v.trim().is_empty()), max)
}

pub fn address(
  raw: &OfflineAddress,
  address_type: AddressType,
  audit: &Audit,
) -> Result<Address, IngestError> {
  let line_two = raw
    .address_line_two
    .as_deref()
    .filter(|v| v.trim() != NULL_LITERAL);

  Ok(Address {
    id: Uuid::new_v4(),
    address_line_one: truncate(
      required(raw.address_line_one.as_deref(), "AddressLineOne")?,
      limits::ADDRESS_LINE_MAX,
    ),
    address_line_two: optional(line_two, limits::ADDRESS_LINE_MAX),
    town_or_city: truncate(
      required(raw.town_or_city.as_deref(), "TownOrCity")?,
      limits::TOWN_OR_CITY_MAX,
    ),
    county: optional(raw.county.as_deref(), limits::COUNTY_MAX),
    post_code: truncate(
      required(raw.post_code.as_deref(), "PostCode")?.trim(),
      limits::POST_CODE_MAX,
    ),
    country: None,
    address_type,
    is_active: true,
    audit: audit.clone(),
  })
}

/// The applicant email exactly as it will be stored and looked up.
pub fn applicant_email(raw: &OfflineApplicant) -> Result<String, IngestError> {
  Ok(truncate(required(raw.email.as_deref(), "ApplicantEmail")?, limits::EMAIL_MAX))
}

/// A new user row. The address is attached separately. A contact id that is
/// present but not a UUID is an error, unlike the best-effort dynamic id.
pub fn user(raw: &OfflineApplicant, email: String, audit: &Audit) -> Result<User, IngestError> {
  let contact_id = match raw.contact_id.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
    Some(v) => Some(Uuid::parse_str(v).map_err(|_| IngestError::InvalidContactId(v.to_owned()))?),
    None => None,
  };

  Ok(User {
    id: Uuid::new_v4(),
    full_name: truncate(
      required(raw.full_name.as_deref(), "ApplicantFullName")?,
      limits::FULL_NAME_MAX,
    ),
    first_name: optional(raw.first_name.as_deref(), limits::FIRST_NAME_MAX),
    last_name: optional(raw.last_name.as_deref(), limits::LAST_NAME_MAX),
    email,
    telephone: optional(raw.telephone.as_deref(), limits::TELEPHONE_MAX),
    contact_id,
    address_id: None,
    role: Some(truncate(&Uuid::new_v4().to_string(), limits::ROLE_MAX)),
    audit: audit.clone(),
  })
}

pub fn owner(raw: &OfflineOwner, address_id: Uuid, audit: &Audit) -> Result<Owner, IngestError> {
  Ok(Owner {
    id: Uuid::new_v4(),
    full_name: truncate(
      required(raw.full_name.as_deref(), "OwnerFullName")?,
      limits::FULL_NAME_MAX,
    ),
    email: truncate(required(raw.email.as_deref(), "OwnerEmail")?, limits::EMAIL_MAX),
    telephone: optional(raw.telephone.as_deref(), limits::TELEPHONE_MAX),
    address_id,
    owner_type: None,
    charity_name: None,
    audit: audit.clone(),
  })
}

/// `breed_id` has already been resolved against the store.
pub fn pet(raw: &OfflinePet, breed_id: Option<i32>, audit: &Audit) -> Result<Pet, IngestError> {
  let species = Species::try_from_id(raw.species_id.ok_or(IngestError::MissingField("PetSpeciesId"))?)?;
  let sex = Sex::try_from_id(raw.sex_id.ok_or(IngestError::MissingField("PetSexId"))?)?;
  let colour_id = raw.colour_id.ok_or(IngestError::MissingField("PetColourId"))?;

  let additional_info = match breed_id {
    Some(id) if is_breed_sentinel(id) => optional(
      raw.additional_info_mixed_breed_or_unknown.as_deref(),
      limits::ADDITIONAL_INFO_MAX,
    ),
    _ => None,
  };
  let other_colour = if requires_other_colour(colour_id) {
    optional(raw.other_colour.as_deref(), limits::OTHER_COLOUR_MAX)
  } else {
    None
  };

  Ok(Pet {
    id: Uuid::new_v4(),
    name: truncate(required(raw.name.as_deref(), "PetName")?, limits::PET_NAME_MAX),
    species,
    breed_id,
    additional_info_mixed_breed_or_unknown: additional_info,
    sex,
    date_of_birth: raw.date_of_birth,
    colour_id,
    other_colour,
    microchip_number: optional(raw.microchip_number.as_deref(), limits::MICROCHIP_NUMBER_MAX),
    microchipped_date: raw.microchipped_date,
    has_unique_feature: raw.has_unique_feature.unwrap_or(false),
    unique_feature_description: optional(
      raw.unique_feature_description.as_deref(),
      limits::UNIQUE_FEATURE_MAX,
    ),
    audit: audit.clone(),
  })
}

/// The rows an application points at.
pub struct Links<'a> {
  pub pet_id:  Uuid,
  pub user_id: Uuid,
  pub owner:   &'a Owner,
}

/// An authorised application. A missing date of application falls back to
/// the audit timestamp; an unparseable dynamic id is dropped.
pub fn application(
  raw: &OfflineApplicationDetails,
  links: Links<'_>,
  audit: &Audit,
) -> Result<Application, IngestError> {
  let dynamic_id = raw
    .dynamic_id
    .as_deref()
    .and_then(|v| Uuid::parse_str(v.trim()).ok());

  Ok(Application {
    id: Uuid::new_v4(),
    pet_id: links.pet_id,
    owner_id: links.owner.id,
    user_id: links.user_id,
    owner_address_id: links.owner.address_id,
    owner_full_name: links.owner.full_name.clone(),
    owner_phone_number: links.owner.telephone.clone(),
    reference_number: truncate(
      required(raw.reference_number.as_deref(), "ReferenceNumber")?,
      limits::REFERENCE_NUMBER_MAX,
    ),
    date_of_application: raw.date_of_application.unwrap_or(audit.created_on),
    status: ApplicationStatus::Authorised,
    dynamic_id,
    date_authorised: raw.date_authorised,
    date_rejected: None,
    date_revoked: None,
    date_suspended: None,
    date_unsuspended: None,
    audit: audit.clone(),
  })
}

/// A lifetime document with no QR code and no validity window.
pub fn travel_document(
  raw: &OfflineTravelDocument,
  application: &Application,
  audit: &Audit,
) -> Result<TravelDocument, IngestError> {
  Ok(TravelDocument {
    id: Uuid::new_v4(),
    application_id: application.id,
    owner_id: application.owner_id,
    pet_id: application.pet_id,
    document_reference_number: truncate(
      required(raw.document_reference_number.as_deref(), "DocumentReferenceNumber")?,
      limits::DOCUMENT_REFERENCE_MAX,
    ),
    qr_code: None,
    is_life_time: true,
    valid_from: None,
    valid_to: None,
    audit: audit.clone(),
  })
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn audit() -> Audit { Audit::created(None, Utc::now()) }

  fn raw_address() -> OfflineAddress {
    OfflineAddress {
      address_line_one: Some("1 High Street".into()),
      address_line_two: Some("NULL".into()),
      town_or_city:     Some("Bristol".into()),
      county:           Some("  ".into()),
      post_code:        Some(" BS1 4DJ ".into()),
    }
  }

  #[test]
  fn null_literal_line_two_is_dropped() {
    let address = address(&raw_address(), AddressType::Owner, &audit()).unwrap();
    assert_eq!(address.address_line_two, None);
    assert_eq!(address.county, None);
    assert_eq!(address.post_code, "BS1 4DJ");
    assert!(address.is_active);
  }

  #[test]
  fn over_long_fields_are_truncated() {
    let mut raw = raw_address();
    raw.address_line_one = Some("x".repeat(limits::ADDRESS_LINE_MAX + 5));
    let address = address(&raw, AddressType::User, &audit()).unwrap();
    assert_eq!(address.address_line_one.len(), limits::ADDRESS_LINE_MAX);
  }

  #[test]
  fn padded_contact_id_is_parsed() {
    let contact = Uuid::new_v4();
    let raw = OfflineApplicant {
      full_name: Some("Sam Smith".into()),
      email: Some("sam@example.com".into()),
      contact_id: Some(format!("  {contact}\t")),
      ..Default::default()
    };
    let email = applicant_email(&raw).unwrap();
    let user = user(&raw, email, &audit()).unwrap();
    assert_eq!(user.contact_id, Some(contact));
    assert!(user.role.as_deref().is_some_and(|r| Uuid::parse_str(r).is_ok()));
  }

  #[test]
  fn malformed_contact_id_is_rejected() {
    let raw = OfflineApplicant {
      full_name: Some("Sam Smith".into()),
      email: Some("sam@example.com".into()),
      contact_id: Some(" not-a-guid ".into()),
      ..Default::default()
    };
    let email = applicant_email(&raw).unwrap();
    assert!(matches!(
      user(&raw, email, &audit()),
      Err(IngestError::InvalidContactId(v)) if v == "not-a-guid"
    ));

    let blank = OfflineApplicant { contact_id: Some("   ".into()), ..raw };
    let email = applicant_email(&blank).unwrap();
    assert_eq!(user(&blank, email, &audit()).unwrap().contact_id, None);
  }

  #[test]
  fn extra_breed_and_colour_text_only_kept_when_needed() {
    let raw = OfflinePet {
      name: Some("Rex".into()),
      species_id: Some(1),
      sex_id: Some(1),
      colour_id: Some(3),
      other_colour: Some("Tri-colored".into()),
      additional_info_mixed_breed_or_unknown: Some("Mixed".into()),
      ..Default::default()
    };
    let pet = pet(&raw, Some(7), &audit()).unwrap();
    assert_eq!(pet.other_colour, None);
    assert_eq!(pet.additional_info_mixed_breed_or_unknown, None);

    let raw = OfflinePet { colour_id: Some(11), ..raw };
    let pet = super::pet(&raw, Some(99), &audit()).unwrap();
    assert_eq!(pet.other_colour.as_deref(), Some("Tri-colored"));
    assert_eq!(pet.additional_info_mixed_breed_or_unknown.as_deref(), Some("Mixed"));
  }

  #[test]
  fn unknown_species_is_an_error_not_a_panic() {
    let raw = OfflinePet {
      name: Some("Rex".into()),
      species_id: Some(9),
      sex_id: Some(1),
      colour_id: Some(3),
      ..Default::default()
    };
    assert!(matches!(
      pet(&raw, None, &audit()),
      Err(IngestError::Core(ptd_core::Error::UnknownSpecies(9)))
    ));
  }
}
