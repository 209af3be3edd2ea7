//! Synchronous rule groups.
//!
//! Each group appends to an [`Errors`] collector and never stops the run;
//! a missing section only skips the checks nested under it.

use chrono::{DateTime, Utc};
use ptd_core::{
  application::ApplicationStatus,
  limits::{self, char_len},
  offline::{
    OfflineAddress, OfflineApplicant, OfflineApplicationDetails, OfflineOwner,
    OfflinePet, OfflineTravelDocument,
  },
  pet::Sex,
};
use uuid::Uuid;

use super::{ValidationError, patterns};

// ─── Collector ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Errors(Vec<ValidationError>);

impl Errors {
  pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.push(ValidationError::new(field, message));
  }

  pub fn extend(&mut self, other: Errors) { self.0.extend(other.0); }

  pub fn into_vec(self) -> Vec<ValidationError> { self.0 }

  /// Require a non-blank value no longer than `max`. Returns the value when
  /// it is present, whatever its length.
  pub fn required<'a>(
    &mut self,
    field: &str,
    label: &str,
    value: Option<&'a str>,
    max: usize,
  ) -> Option<&'a str> {
    match non_blank(value) {
      None => {
        self.push(field, format!("{label} is required"));
        None
      }
      Some(v) => {
        self.max_len(field, label, Some(v), max);
        Some(v)
      }
    }
  }

  /// Check length only when a value was supplied.
  pub fn max_len(&mut self, field: &str, label: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value
      && char_len(v) > max
    {
      self.push(field, format!("{label} cannot exceed {max} characters"));
    }
  }
}

pub fn non_blank(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

// ─── 1. Owner ────────────────────────────────────────────────────────────────

pub fn owner(errors: &mut Errors, owner: Option<&OfflineOwner>) {
  let Some(owner) = owner else {
    errors.push("Owner", "Owner details are required");
    return;
  };

  errors.required(
    "OwnerFullName",
    "Owner full name",
    owner.full_name.as_deref(),
    limits::FULL_NAME_MAX,
  );
  contact_details(errors, "Owner", "owner", owner.email.as_deref(), owner.telephone.as_deref());
}

// ─── 2. Applicant ────────────────────────────────────────────────────────────

pub fn applicant(errors: &mut Errors, applicant: Option<&OfflineApplicant>) {
  let Some(applicant) = applicant else {
    errors.push("Applicant", "Applicant details are required");
    return;
  };

  errors.required(
    "ApplicantFullName",
    "Applicant full name",
    applicant.full_name.as_deref(),
    limits::FULL_NAME_MAX,
  );
  errors.max_len(
    "ApplicantFirstName",
    "Applicant first name",
    applicant.first_name.as_deref(),
    limits::FIRST_NAME_MAX,
  );
  errors.max_len(
    "ApplicantLastName",
    "Applicant last name",
    applicant.last_name.as_deref(),
    limits::LAST_NAME_MAX,
  );
  contact_details(
    errors,
    "Applicant",
    "applicant",
    applicant.email.as_deref(),
    applicant.telephone.as_deref(),
  );

  if let Some(contact_id) = non_blank(applicant.contact_id.as_deref())
    && Uuid::parse_str(contact_id.trim()).is_err()
  {
    errors.push("ContactId", "Invalid contact id format");
  }
}

/// Email (required) and phone (optional) for owner or applicant.
fn contact_details(
  errors: &mut Errors,
  prefix: &str,
  party: &str,
  email: Option<&str>,
  phone: Option<&str>,
) {
  let email_field = format!("{prefix}Email");
  if let Some(email) = errors.required(&email_field, &format!("{prefix} email"), email, limits::EMAIL_MAX)
    && !patterns::is_mailbox(email)
  {
    errors.push(email_field, format!("Invalid {party} email format"));
  }

  let phone_field = format!("{prefix}Phone");
  if let Some(phone) = non_blank(phone) {
    errors.max_len(&phone_field, &format!("{prefix} phone number"), Some(phone), limits::TELEPHONE_MAX);
    if !patterns::is_phone_number(phone) {
      errors.push(phone_field, format!("Invalid {party} phone number format"));
    }
  }
}

// ─── 5. Pet basics ───────────────────────────────────────────────────────────

pub fn pet_basics(errors: &mut Errors, pet: &OfflinePet, now: DateTime<Utc>) {
  if pet.sex_id.and_then(Sex::from_repr).is_none() {
    errors.push("PetSexId", "Invalid sex id");
  }

  errors.required("PetName", "Pet name", pet.name.as_deref(), limits::PET_NAME_MAX);

  if let Some(chip) = non_blank(pet.microchip_number.as_deref()) {
    errors.max_len(
      "PetMicrochipNumber",
      "Microchip number",
      Some(chip),
      limits::MICROCHIP_NUMBER_MAX,
    );
    if !patterns::is_microchip_number(chip) {
      errors.push("PetMicrochipNumber", "Microchip number must be exactly 15 digits");
    }
  }

  if pet.date_of_birth.is_some_and(|dob| dob > now) {
    errors.push("PetDateOfBirth", "Date of birth cannot be in the future");
  }
  if pet.microchipped_date.is_some_and(|at| at > now) {
    errors.push("PetMicrochippedDate", "Microchipped date cannot be in the future");
  }

  errors.max_len(
    "AdditionalInfoMixedBreedOrUnknown",
    "Additional breed information",
    pet.additional_info_mixed_breed_or_unknown.as_deref(),
    limits::ADDITIONAL_INFO_MAX,
  );
  errors.max_len(
    "UniqueFeatureDescription",
    "Unique feature description",
    pet.unique_feature_description.as_deref(),
    limits::UNIQUE_FEATURE_MAX,
  );
}

// ─── 6. Addresses ────────────────────────────────────────────────────────────

/// `prefix` is `"Owner"` or `"Applicant"`; it namespaces every field key.
pub fn address(errors: &mut Errors, prefix: &str, address: Option<&OfflineAddress>, required: bool) {
  let Some(address) = address else {
    if required {
      errors.push(format!("{prefix}Address"), format!("{prefix} address is required"));
    }
    return;
  };

  errors.required(
    &format!("{prefix}AddressLineOne"),
    "Address line one",
    address.address_line_one.as_deref(),
    limits::ADDRESS_LINE_MAX,
  );
  errors.max_len(
    &format!("{prefix}AddressLineTwo"),
    "Address line two",
    address.address_line_two.as_deref(),
    limits::ADDRESS_LINE_MAX,
  );
  errors.required(
    &format!("{prefix}TownOrCity"),
    "Town or city",
    address.town_or_city.as_deref(),
    limits::TOWN_OR_CITY_MAX,
  );
  errors.max_len(
    &format!("{prefix}County"),
    "County",
    address.county.as_deref(),
    limits::COUNTY_MAX,
  );

  let post_code_field = format!("{prefix}PostCode");
  if let Some(post_code) = errors.required(
    &post_code_field,
    "Postcode",
    address.post_code.as_deref(),
    limits::POST_CODE_MAX,
  ) && !patterns::is_uk_postcode(post_code.trim())
  {
    errors.push(post_code_field, "Invalid postcode format");
  }
}

// ─── 7. Application basics ───────────────────────────────────────────────────

pub fn application(errors: &mut Errors, application: &OfflineApplicationDetails) {
  let status = application.status.as_deref().map(ApplicationStatus::parse);
  if !matches!(status, Some(Ok(ApplicationStatus::Authorised))) {
    errors.push("Status", "Status must be 'Authorised' for offline applications");
  }

  if application.date_authorised.is_none() {
    errors.push("DateAuthorised", "Date authorised is required");
  }

  if let Some(reference) = errors.required(
    "ReferenceNumber",
    "Reference number",
    application.reference_number.as_deref(),
    limits::REFERENCE_NUMBER_MAX,
  ) && !patterns::is_reference_number(reference)
  {
    errors.push("ReferenceNumber", "Invalid reference number format");
  }

  if let Some(dynamic_id) = non_blank(application.dynamic_id.as_deref())
    && Uuid::parse_str(dynamic_id.trim()).is_err()
  {
    errors.push("DynamicId", "Invalid dynamic id format");
  }
}

// ─── 8. Application dates ────────────────────────────────────────────────────

pub fn application_dates(
  errors: &mut Errors,
  application: &OfflineApplicationDetails,
  now: DateTime<Utc>,
) {
  let today = now.date_naive();

  if let Some(applied) = application.date_of_application {
    if applied.date_naive() > today {
      errors.push("DateOfApplication", "Date of application cannot be in the future");
    }
    if let Some(authorised) = application.date_authorised
      && authorised.date_naive() < applied.date_naive()
    {
      errors.push("DateAuthorised", "Date authorised cannot be before date of application");
    }
  }
}

// ─── 9. IDCOMS format re-check ───────────────────────────────────────────────

pub fn idcoms(
  errors: &mut Errors,
  application: Option<&OfflineApplicationDetails>,
  owner: Option<&OfflineOwner>,
  pet: Option<&OfflinePet>,
) {
  if let Some(reference) = non_blank(application.and_then(|a| a.reference_number.as_deref()))
    && !patterns::is_idcoms_reference_number(reference)
  {
    errors.push("ReferenceNumber", "Reference number does not match the IDCOMS format");
  }

  name_window(errors, "OwnerFullName", "Owner full name", owner.and_then(|o| o.full_name.as_deref()));
  name_window(errors, "PetName", "Pet name", pet.and_then(|p| p.name.as_deref()));
}

fn name_window(errors: &mut Errors, field: &str, label: &str, value: Option<&str>) {
  if let Some(name) = non_blank(value) {
    let len = char_len(name);
    if !(limits::NAME_MIN..=limits::FULL_NAME_MAX).contains(&len) {
      errors.push(
        field,
        format!(
          "{label} must be between {} and {} characters",
          limits::NAME_MIN,
          limits::FULL_NAME_MAX
        ),
      );
    }
  }
}

// ─── 10. Travel document ─────────────────────────────────────────────────────

pub fn travel_document(
  errors: &mut Errors,
  ptd: Option<&OfflineTravelDocument>,
  application: Option<&OfflineApplicationDetails>,
) {
  let Some(ptd) = ptd else {
    errors.push("Ptd", "Travel document details are required");
    return;
  };

  let Some(document_reference) = errors.required(
    "DocumentReferenceNumber",
    "Document reference number",
    ptd.document_reference_number.as_deref(),
    limits::DOCUMENT_REFERENCE_MAX,
  ) else {
    return;
  };

  if let Some(reference) = non_blank(application.and_then(|a| a.reference_number.as_deref()))
    && document_reference != reference
  {
    errors.push(
      "ReferenceNumber",
      format!(
        "Document reference number '{document_reference}' does not match \
         application reference number '{reference}'"
      ),
    );
  }
}
