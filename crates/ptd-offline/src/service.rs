//! The offline-application ingestion workflow.
//!
//! [`OfflineApplicationService::process`] validates a payload and, if it
//! passes, stages six related rows on one [`UnitOfWork`]:
//!
//! 1. the owner's address, plus the applicant's when it differs,
//! 2. the applicant user, reused when one already exists for the email,
//! 3. the owner,
//! 4. the pet,
//! 5. the application,
//! 6. the travel document.
//!
//! The unit of work is committed once at the end. Any error before that
//! drops it, which discards everything staged.

use std::sync::Arc;

use chrono::Utc;
use ptd_core::{
  UnitOfWork,
  address::AddressType,
  audit::Audit,
  offline::{OfflineApplicant, OfflineApplication, OfflinePet},
  pet::is_breed_sentinel,
  store::{PetTravelStore, ReferenceData},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
  error::{IngestError, ProcessingError},
  mapping::{self, Links},
  validation::MappingValidator,
};

type Result<T, E = IngestError> = std::result::Result<T, E>;

fn section<'a, T>(value: Option<&'a T>, name: &'static str) -> Result<&'a T> {
  value.ok_or(IngestError::MissingSection(name))
}

pub struct OfflineApplicationService<S, R = S> {
  store:     Arc<S>,
  validator: MappingValidator<R>,
}

impl<S, R> OfflineApplicationService<S, R>
where
  S: PetTravelStore,
  R: ReferenceData,
{
  pub fn new(store: Arc<S>, validator: MappingValidator<R>) -> Self { Self { store, validator } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn validator(&self) -> &MappingValidator<R> { &self.validator }

  /// Validate and ingest one payload. Either every row is written or none.
  pub async fn process(
    &self,
    payload: Option<&OfflineApplication>,
  ) -> Result<(), ProcessingError> {
    let result = self.validator.validate(payload).await;
    let payload = match payload {
      Some(payload) if result.is_valid() => payload,
      _ => {
        warn!(
          reference = payload.and_then(|p| p.reference_number()).unwrap_or_default(),
          errors = result.errors.len(),
          "offline application rejected"
        );
        return Err(ProcessingError::Validation(result.summary()));
      }
    };

    let reference = payload.reference_number().unwrap_or_default().to_owned();
    match self.ingest(payload).await {
      Ok(application_id) => {
        info!(%reference, %application_id, "offline application ingested");
        Ok(())
      }
      Err(source) => {
        error!(%reference, error = %source, "offline application failed, rolled back");
        Err(ProcessingError::Failed { reference, source })
      }
    }
  }

  async fn ingest(&self, payload: &OfflineApplication) -> Result<Uuid> {
    let store = self.store.as_ref();
    let audit = Audit::created(payload.created_by, Utc::now());
    let mut uow = store.begin();

    let owner_address_raw = section(payload.owner_address.as_ref(), "Owner address")?;
    let owner_address = mapping::address(owner_address_raw, AddressType::Owner, &audit)?;
    let owner_address_id = owner_address.id;
    uow.add_address(owner_address);

    let applicant_address_id = match payload.applicant_address.as_ref() {
      Some(raw) if !raw.same_location(owner_address_raw) => {
        let address = mapping::address(raw, AddressType::User, &audit)?;
        let id = address.id;
        uow.add_address(address);
        Some(id)
      }
      _ => None,
    };

    let applicant = section(payload.applicant.as_ref(), "Applicant")?;
    let user_id = resolve_user(&mut uow, applicant, applicant_address_id, &audit).await?;

    let owner = mapping::owner(section(payload.owner.as_ref(), "Owner")?, owner_address_id, &audit)?;

    let pet_raw = section(payload.pet.as_ref(), "Pet")?;
    let breed_id = self.resolve_breed(pet_raw).await?;
    let pet = mapping::pet(pet_raw, breed_id, &audit)?;

    let application = mapping::application(
      section(payload.application.as_ref(), "Application")?,
      Links { pet_id: pet.id, user_id, owner: &owner },
      &audit,
    )?;
    let document =
      mapping::travel_document(section(payload.ptd.as_ref(), "Travel document")?, &application, &audit)?;

    let application_id = application.id;
    uow.add_owner(owner);
    uow.add_pet(pet);
    uow.add_application(application);
    uow.add_travel_document(document);

    let written = uow.commit().await.map_err(IngestError::store)?;
    debug!(%application_id, written, "offline application committed");
    Ok(application_id)
  }

  /// Re-check a non-sentinel breed against the store. The validator looked
  /// it up too, but possibly against a different snapshot.
  async fn resolve_breed(&self, pet: &OfflinePet) -> Result<Option<i32>> {
    let Some(breed_id) = pet.breed_id else {
      return Ok(None);
    };
    if is_breed_sentinel(breed_id) {
      return Ok(Some(breed_id));
    }

    match self.store.find_breed(breed_id).await.map_err(IngestError::store)? {
      Some(breed) => Ok(Some(breed.id)),
      None => Err(IngestError::InvalidBreed(breed_id)),
    }
  }
}

/// Find the applicant by exact email or stage a new user. If the applicant
/// brought their own address, the association is staged as a separate update.
async fn resolve_user<S: PetTravelStore>(
  uow: &mut UnitOfWork<'_, S>,
  applicant: &OfflineApplicant,
  address_id: Option<Uuid>,
  audit: &Audit,
) -> Result<Uuid> {
  let email = mapping::applicant_email(applicant)?;

  let mut user = match uow
    .store()
    .find_user_by_email(&email)
    .await
    .map_err(IngestError::store)?
  {
    Some(existing) => {
      debug!(user_id = %existing.id, "reusing existing applicant");
      existing
    }
    None => {
      let user = mapping::user(applicant, email, audit)?;
      uow.add_user(user.clone());
      user
    }
  };

  if let Some(address_id) = address_id {
    user.address_id = Some(address_id);
    user.audit.touch(audit.created_by, audit.created_on);
    uow.update_user(user.clone());
  }
  Ok(user.id)
}
