//! The offline-application validation engine.
//!
//! [`MappingValidator::validate`] checks a raw payload against every rule
//! group and returns all violations it finds. Business-rule failures are
//! never errors: they are entries in the returned [`ValidationResult`].
//!
//! The whole run is bounded by [`ValidatorConfig::overall_timeout`]. The two
//! reference-data lookups (breed and colour) run concurrently, each bounded
//! by `min(lookup_timeout, time left in the run)`. If anything times out the
//! result collapses to a single `Timeout` error.

mod deadline;
mod patterns;
mod rules;

use std::{fmt, future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use ptd_core::{
  offline::{OfflineApplication, OfflinePet},
  pet::{Species, is_breed_sentinel, requires_other_colour},
  store::ReferenceData,
};
use tokio::time::{timeout, timeout_at};
use tracing::{debug, warn};

pub use self::deadline::Deadline;
use self::rules::{Errors, non_blank};

// ─── Results ─────────────────────────────────────────────────────────────────

/// One failed rule, keyed by a stable field name such as `OwnerEmail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
  pub field:   String,
  pub message: String,
}

impl ValidationError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.field, self.message)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
  pub errors: Vec<ValidationError>,
}

impl ValidationResult {
  fn single(field: &str, message: impl Into<String>) -> Self {
    Self { errors: vec![ValidationError::new(field, message)] }
  }

  pub fn is_valid(&self) -> bool { self.errors.is_empty() }

  pub fn has_error(&self, field: &str) -> bool {
    self.errors.iter().any(|e| e.field == field)
  }

  /// Messages recorded against `field`, in rule order.
  pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    self
      .errors
      .iter()
      .filter(move |e| e.field == field)
      .map(|e| e.message.as_str())
  }

  /// Every `Field: Message` pair joined with `", "`.
  pub fn summary(&self) -> String {
    self
      .errors
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(", ")
  }
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
  /// Budget for one whole validation run.
  pub overall_timeout: Duration,
  /// Budget for a single reference-data lookup, further capped by whatever
  /// remains of `overall_timeout`.
  pub lookup_timeout:  Duration,
}

impl Default for ValidatorConfig {
  fn default() -> Self {
    Self {
      overall_timeout: Duration::from_secs(30),
      lookup_timeout:  Duration::from_secs(30),
    }
  }
}

// ─── Validator ───────────────────────────────────────────────────────────────

/// Ends a run early, replacing any itemised errors.
#[derive(Debug)]
enum Abort {
  Timeout,
  Unexpected(String),
}

pub struct MappingValidator<R> {
  reference: Arc<R>,
  config:    ValidatorConfig,
}

impl<R> Clone for MappingValidator<R> {
  fn clone(&self) -> Self {
    Self { reference: Arc::clone(&self.reference), config: self.config }
  }
}

impl<R: ReferenceData> MappingValidator<R> {
  pub fn new(reference: Arc<R>) -> Self { Self::with_config(reference, ValidatorConfig::default()) }

  pub fn with_config(reference: Arc<R>, config: ValidatorConfig) -> Self {
    Self { reference, config }
  }

  pub fn config(&self) -> ValidatorConfig { self.config }

  /// Validate a payload. `None` yields a single `Model` error.
  pub async fn validate(&self, payload: Option<&OfflineApplication>) -> ValidationResult {
    let Some(payload) = payload else {
      return ValidationResult::single("Model", "Request model cannot be null");
    };

    let deadline = Deadline::after(self.config.overall_timeout);
    let outcome = timeout_at(deadline.instant(), self.run(payload, deadline)).await;

    match outcome {
      Ok(Ok(errors)) => {
        if !errors.is_empty() {
          debug!(
            reference = payload.reference_number().unwrap_or_default(),
            errors = errors.len(),
            "payload failed validation"
          );
        }
        ValidationResult { errors }
      }
      Ok(Err(Abort::Timeout)) | Err(_) => {
        warn!(
          reference = payload.reference_number().unwrap_or_default(),
          "validation timed out"
        );
        ValidationResult::single("Timeout", "Validation operation timed out")
      }
      Ok(Err(Abort::Unexpected(message))) => {
        warn!(
          reference = payload.reference_number().unwrap_or_default(),
          error = %message,
          "unexpected validation error"
        );
        ValidationResult::single("Validation", format!("Unexpected validation error: {message}"))
      }
    }
  }

  async fn run(
    &self,
    payload: &OfflineApplication,
    deadline: Deadline,
  ) -> Result<Vec<ValidationError>, Abort> {
    let now = Utc::now();
    let mut errors = Errors::default();

    rules::owner(&mut errors, payload.owner.as_ref());
    rules::applicant(&mut errors, payload.applicant.as_ref());

    match payload.pet.as_ref() {
      Some(pet) => {
        let (breed, colour) =
          tokio::join!(self.check_breed(pet, deadline), self.check_colour(pet, deadline));
        // A timeout on either side wins over anything the other side found.
        let (breed, colour) = match (breed, colour) {
          (Err(Abort::Timeout), _) | (_, Err(Abort::Timeout)) => return Err(Abort::Timeout),
          (breed, colour) => (breed?, colour?),
        };
        errors.extend(breed);
        errors.extend(colour);
        rules::pet_basics(&mut errors, pet, now);
      }
      None => errors.push("Pet", "Pet details are required"),
    }

    rules::address(&mut errors, "Owner", payload.owner_address.as_ref(), true);
    rules::address(&mut errors, "Applicant", payload.applicant_address.as_ref(), false);

    match payload.application.as_ref() {
      Some(application) => {
        rules::application(&mut errors, application);
        rules::application_dates(&mut errors, application, now);
      }
      None => errors.push("Application", "Application details are required"),
    }

    rules::idcoms(
      &mut errors,
      payload.application.as_ref(),
      payload.owner.as_ref(),
      payload.pet.as_ref(),
    );
    rules::travel_document(&mut errors, payload.ptd.as_ref(), payload.application.as_ref());

    Ok(errors.into_vec())
  }

  // ─── 3. Breed ──────────────────────────────────────────────────────────────

  async fn check_breed(&self, pet: &OfflinePet, deadline: Deadline) -> Result<Errors, Abort> {
    let mut errors = Errors::default();

    let Some(species) = pet.species_id.and_then(Species::from_repr) else {
      errors.push("PetSpeciesId", "Invalid species id");
      return Ok(errors);
    };

    let Some(breed_id) = pet.breed_id else {
      if !species.allows_missing_breed() {
        errors.push("PetBreedId", format!("Breed id is required for species {species}"));
      }
      return Ok(errors);
    };

    if is_breed_sentinel(breed_id) {
      if non_blank(pet.additional_info_mixed_breed_or_unknown.as_deref()).is_none() {
        errors.push(
          "AdditionalInfoMixedBreedOrUnknown",
          "Additional information is required for a mixed or unknown breed",
        );
      }
      return Ok(errors);
    }

    match self.lookup(deadline, self.reference.find_breed(breed_id)).await? {
      None => errors.push("PetBreedId", "Invalid breed id"),
      Some(breed) if breed.species_id != species.id() => errors.push(
        "PetBreedId",
        format!("Breed '{}' is not valid for species {species}", breed.name),
      ),
      Some(_) => {}
    }
    Ok(errors)
  }

  // ─── 4. Colour ─────────────────────────────────────────────────────────────

  async fn check_colour(&self, pet: &OfflinePet, deadline: Deadline) -> Result<Errors, Abort> {
    let mut errors = Errors::default();

    let Some(colour_id) = pet.colour_id else {
      errors.push("PetColourId", "Colour id is required");
      return Ok(errors);
    };

    if self
      .lookup(deadline, self.reference.find_colour(colour_id))
      .await?
      .is_none()
    {
      errors.push("PetColourId", "Invalid colour id");
    }

    if requires_other_colour(colour_id) && non_blank(pet.other_colour.as_deref()).is_none() {
      errors.push("OtherColour", "Other colour is required for the selected colour");
    }
    Ok(errors)
  }

  /// Await one reference-data lookup within its share of the deadline.
  async fn lookup<T, E, F>(&self, deadline: Deadline, lookup: F) -> Result<T, Abort>
  where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
  {
    match timeout(deadline.budget(self.config.lookup_timeout), lookup).await {
      Ok(Ok(found)) => Ok(found),
      Ok(Err(e)) => Err(Abort::Unexpected(e.to_string())),
      Err(_) => Err(Abort::Timeout),
    }
  }
}
