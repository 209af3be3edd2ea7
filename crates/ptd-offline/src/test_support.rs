//! Fixtures shared by the validator and workflow tests.

use std::{
  collections::HashMap,
  sync::atomic::{AtomicUsize, Ordering},
};

use chrono::{Duration, TimeZone, Utc};
use ptd_core::{
  offline::{
    OfflineAddress, OfflineApplicant, OfflineApplication, OfflineApplicationDetails,
    OfflineOwner, OfflinePet, OfflineTravelDocument,
  },
  reference::{Breed, Colour, ReferenceDataSet},
  store::ReferenceData,
};
use uuid::Uuid;

pub const REFERENCE: &str = "GB12345678";

pub fn reference_data() -> ReferenceDataSet {
  ReferenceDataSet {
    breeds:  vec![
      Breed { id: 7, name: "Labrador".into(), species_id: 1 },
      Breed { id: 8, name: "Siamese".into(), species_id: 2 },
    ],
    colours: vec![
      Colour { id: 3, name: "Black".into() },
      Colour { id: 11, name: "Other".into() },
      Colour { id: 20, name: "Other".into() },
      Colour { id: 29, name: "Other".into() },
    ],
  }
}

pub fn valid_payload() -> OfflineApplication {
  let today = Utc::now();

  OfflineApplication {
    owner_address:     Some(OfflineAddress {
      address_line_one: Some("1 High Street".into()),
      address_line_two: None,
      town_or_city:     Some("Bristol".into()),
      county:           Some("Avon".into()),
      post_code:        Some("BS1 4DJ".into()),
    }),
    applicant_address: None,
    owner:             Some(OfflineOwner {
      full_name: Some("Olive Owner".into()),
      email:     Some("olive@example.com".into()),
      telephone: Some("01234 567890".into()),
    }),
    applicant:         Some(OfflineApplicant {
      full_name:  Some("Sam Applicant".into()),
      first_name: Some("Sam".into()),
      last_name:  Some("Applicant".into()),
      email:      Some("sam@example.com".into()),
      telephone:  Some("07700 900123".into()),
      contact_id: None,
    }),
    pet:               Some(OfflinePet {
      name: Some("Rex".into()),
      species_id: Some(1),
      breed_id: Some(7),
      sex_id: Some(1),
      date_of_birth: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
      colour_id: Some(3),
      microchip_number: Some("826012345678901".into()),
      microchipped_date: Some(Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap()),
      has_unique_feature: Some(false),
      ..Default::default()
    }),
    application:       Some(OfflineApplicationDetails {
      reference_number:    Some(REFERENCE.into()),
      date_of_application: Some(today - Duration::days(2)),
      status:              Some("Authorised".into()),
      date_authorised:     Some(today - Duration::days(1)),
      dynamic_id:          Some(Uuid::new_v4().to_string()),
    }),
    ptd:               Some(OfflineTravelDocument {
      document_reference_number: Some(REFERENCE.into()),
    }),
    created_by:        None,
  }
}

/// Set both the application and document reference numbers.
pub fn with_reference(mut payload: OfflineApplication, reference: &str) -> OfflineApplication {
  if let Some(application) = payload.application.as_mut() {
    application.reference_number = Some(reference.into());
  }
  if let Some(ptd) = payload.ptd.as_mut() {
    ptd.document_reference_number = Some(reference.into());
  }
  payload
}

// ─── Fake reference data ─────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("reference data unavailable")]
pub struct Unavailable;

/// In-memory reference data that can be told to stall or fail.
#[derive(Default)]
pub struct FakeReference {
  breeds:            HashMap<i32, Breed>,
  colours:           HashMap<i32, Colour>,
  pub stall_breeds:  bool,
  pub stall_colours: bool,
  pub fail:          bool,
  lookups:           AtomicUsize,
}

impl FakeReference {
  pub fn new(data: ReferenceDataSet) -> Self {
    Self {
      breeds: data.breeds.into_iter().map(|b| (b.id, b)).collect(),
      colours: data.colours.into_iter().map(|c| (c.id, c)).collect(),
      ..Default::default()
    }
  }

  pub fn lookups(&self) -> usize { self.lookups.load(Ordering::SeqCst) }

  async fn enter(&self, stall: bool) -> Result<(), Unavailable> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    if stall {
      std::future::pending::<()>().await;
    }
    if self.fail {
      return Err(Unavailable);
    }
    Ok(())
  }
}

impl ReferenceData for FakeReference {
  type Error = Unavailable;

  async fn find_breed(&self, id: i32) -> Result<Option<Breed>, Self::Error> {
    self.enter(self.stall_breeds).await?;
    Ok(self.breeds.get(&id).cloned())
  }

  async fn find_colour(&self, id: i32) -> Result<Option<Colour>, Self::Error> {
    self.enter(self.stall_colours).await?;
    Ok(self.colours.get(&id).cloned())
  }
}
