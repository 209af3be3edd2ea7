//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use ptd_core::{
  address::{Address, AddressType},
  application::{Application, ApplicationStatus},
  audit::Audit,
  owner::Owner,
  pet::{Pet, Sex, Species},
  reference::{Breed, Colour, ReferenceDataSet},
  store::{PetTravelStore, ReferenceData},
  travel_document::TravelDocument,
  user::User,
};
use uuid::Uuid;

use crate::{Entity, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn audit() -> Audit {
  Audit::created(None, Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
}

fn address() -> Address {
  Address {
    id:               Uuid::new_v4(),
    address_line_one: "1 High Street".into(),
    address_line_two: None,
    town_or_city:     "Bristol".into(),
    county:           Some("Avon".into()),
    post_code:        "BS1 4DJ".into(),
    country:          None,
    address_type:     AddressType::Owner,
    is_active:        true,
    audit:            audit(),
  }
}

fn user(email: &str) -> User {
  User {
    id:         Uuid::new_v4(),
    full_name:  "Sam Applicant".into(),
    first_name: Some("Sam".into()),
    last_name:  Some("Applicant".into()),
    email:      email.into(),
    telephone:  None,
    contact_id: None,
    address_id: None,
    role:       Some(Uuid::new_v4().to_string()),
    audit:      audit(),
  }
}

fn owner(address_id: Uuid) -> Owner {
  Owner {
    id: Uuid::new_v4(),
    full_name: "Olive Owner".into(),
    email: "olive@example.com".into(),
    telephone: Some("01234 567890".into()),
    address_id,
    owner_type: None,
    charity_name: None,
    audit: audit(),
  }
}

fn pet() -> Pet {
  Pet {
    id:                                     Uuid::new_v4(),
    name:                                   "Rex".into(),
    species:                                Species::Dog,
    breed_id:                               Some(99),
    additional_info_mixed_breed_or_unknown: Some("Collie cross".into()),
    sex:                                    Sex::Male,
    date_of_birth:                          Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
    colour_id:                              11,
    other_colour:                           Some("Tri-colored".into()),
    microchip_number:                       Some("123456789012345".into()),
    microchipped_date:                      None,
    has_unique_feature:                     false,
    unique_feature_description:             None,
    audit:                                  audit(),
  }
}

struct Graph {
  address:     Address,
  user:        User,
  owner:       Owner,
  pet:         Pet,
  application: Application,
  document:    TravelDocument,
}

fn graph(reference: &str) -> Graph {
  let address = address();
  let user = user("sam@example.com");
  let owner = owner(address.id);
  let pet = pet();
  let at = Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap();

  let application = Application {
    id:                  Uuid::new_v4(),
    pet_id:              pet.id,
    owner_id:            owner.id,
    user_id:             user.id,
    owner_address_id:    address.id,
    owner_full_name:     owner.full_name.clone(),
    owner_phone_number:  owner.telephone.clone(),
    reference_number:    reference.into(),
    date_of_application: at,
    status:              ApplicationStatus::Authorised,
    dynamic_id:          Some(Uuid::new_v4()),
    date_authorised:     Some(at),
    date_rejected:       None,
    date_revoked:        None,
    date_suspended:      None,
    date_unsuspended:    None,
    audit:               audit(),
  };

  let document = TravelDocument {
    id:                        Uuid::new_v4(),
    application_id:            application.id,
    owner_id:                  owner.id,
    pet_id:                    pet.id,
    document_reference_number: reference.into(),
    qr_code:                   None,
    is_life_time:              true,
    valid_from:                None,
    valid_to:                  None,
    audit:                     audit(),
  };

  Graph { address, user, owner, pet, application, document }
}

async fn commit_graph(s: &SqliteStore, g: &Graph) -> usize {
  let mut uow = s.begin();
  uow.add_address(g.address.clone());
  uow.add_user(g.user.clone());
  uow.add_owner(g.owner.clone());
  uow.add_pet(g.pet.clone());
  uow.add_application(g.application.clone());
  uow.add_travel_document(g.document.clone());
  uow.commit().await.unwrap()
}

// ─── Unit of work ────────────────────────────────────────────────────────────

#[tokio::test]
async fn commit_writes_every_entity() {
  let s = store().await;
  let g = graph("GB12345678");

  let written = commit_graph(&s, &g).await;
  assert_eq!(written, 6);

  assert_eq!(s.find_address(g.address.id).await.unwrap(), Some(g.address.clone()));
  assert_eq!(s.find_user(g.user.id).await.unwrap(), Some(g.user.clone()));
  assert_eq!(s.find_owner(g.owner.id).await.unwrap(), Some(g.owner.clone()));
  assert_eq!(s.find_pet(g.pet.id).await.unwrap(), Some(g.pet.clone()));
  assert_eq!(
    s.find_application(g.application.id).await.unwrap(),
    Some(g.application.clone())
  );
  assert_eq!(
    s.find_travel_document(g.document.id).await.unwrap(),
    Some(g.document.clone())
  );
}

#[tokio::test]
async fn failing_change_rolls_back_whole_set() {
  let s = store().await;
  let g = graph("GB12345678");

  // The travel document points at an application that is never written.
  let mut uow = s.begin();
  uow.add_address(g.address.clone());
  uow.add_user(g.user.clone());
  uow.add_travel_document(g.document.clone());
  assert!(uow.commit().await.is_err());

  assert_eq!(s.count(Entity::Address).await.unwrap(), 0);
  assert_eq!(s.count(Entity::User).await.unwrap(), 0);
  assert_eq!(s.count(Entity::TravelDocument).await.unwrap(), 0);
}

#[tokio::test]
async fn dropped_unit_of_work_writes_nothing() {
  let s = store().await;
  {
    let mut uow = s.begin();
    uow.add_address(address());
    uow.add_user(user("dropped@example.com"));
    assert_eq!(uow.pending(), 2);
  }
  let mut uow = s.begin();
  uow.add_address(address());
  uow.rollback();

  assert_eq!(s.count(Entity::Address).await.unwrap(), 0);
  assert_eq!(s.count(Entity::User).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_commit_is_a_no_op() {
  let s = store().await;
  assert_eq!(s.begin().commit().await.unwrap(), 0);
}

#[tokio::test]
async fn update_of_missing_user_fails() {
  let s = store().await;
  let mut uow = s.begin();
  uow.add_address(address());
  uow.update_user(user("ghost@example.com"));
  assert!(uow.commit().await.is_err());
  assert_eq!(s.count(Entity::Address).await.unwrap(), 0);
}

#[tokio::test]
async fn update_user_attaches_address() {
  let s = store().await;
  let a = address();
  let mut u = user("sam@example.com");

  let mut uow = s.begin();
  uow.add_address(a.clone());
  uow.add_user(u.clone());
  u.address_id = Some(a.id);
  uow.update_user(u.clone());
  assert_eq!(uow.commit().await.unwrap(), 3);

  let stored = s.find_user(u.id).await.unwrap().unwrap();
  assert_eq!(stored.address_id, Some(a.id));
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_lookup_by_email_is_exact() {
  let s = store().await;
  let u = user("Sam@Example.com");
  let mut uow = s.begin();
  uow.add_user(u.clone());
  uow.commit().await.unwrap();

  assert_eq!(
    s.find_user_by_email("Sam@Example.com").await.unwrap().map(|u| u.id),
    Some(u.id)
  );
  assert!(s.find_user_by_email("sam@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_lookup_returns_the_oldest_row() {
  let s = store().await;
  let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

  // Written newest first; the older row has a sub-second timestamp.
  let mut newer = user("dup@example.com");
  newer.audit = Audit::created(None, base + chrono::Duration::seconds(1));
  let mut older = user("dup@example.com");
  older.audit = Audit::created(None, base + chrono::Duration::milliseconds(250));

  let mut uow = s.begin();
  uow.add_user(newer);
  uow.add_user(older.clone());
  uow.commit().await.unwrap();

  let found = s.find_user_by_email("dup@example.com").await.unwrap().unwrap();
  assert_eq!(found.id, older.id);
  assert_eq!(found.audit.created_on, older.audit.created_on);
}

#[tokio::test]
async fn user_lookup_by_contact_id() {
  let s = store().await;
  let contact = Uuid::new_v4();
  let mut u = user("contact@example.com");
  u.contact_id = Some(contact);
  let mut uow = s.begin();
  uow.add_user(u.clone());
  uow.commit().await.unwrap();

  let found = s.find_user_by_contact_id(contact).await.unwrap().unwrap();
  assert_eq!(found.id, u.id);
  assert!(s.find_user_by_contact_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn travel_document_by_composite_key() {
  let s = store().await;
  let g = graph("GB826AD1F2E");
  commit_graph(&s, &g).await;

  let found = s
    .find_travel_document_by_composite_key(g.application.id, g.owner.id, g.pet.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.document_reference_number, "GB826AD1F2E");
  assert!(found.is_life_time);

  let miss = s
    .find_travel_document_by_composite_key(g.application.id, Uuid::new_v4(), g.pet.id)
    .await
    .unwrap();
  assert!(miss.is_none());
}

#[tokio::test]
async fn application_lookups_and_status_update() {
  let s = store().await;
  let g = graph("GB87654321");
  commit_graph(&s, &g).await;

  let by_ref = s
    .find_application_by_reference("GB87654321")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(by_ref.id, g.application.id);

  let dynamic_id = g.application.dynamic_id.unwrap();
  let mut app = s
    .find_application_by_dynamic_id(dynamic_id)
    .await
    .unwrap()
    .unwrap();
  let revoked_at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
  app.transition(ApplicationStatus::Revoked, revoked_at);

  let mut uow = s.begin();
  uow.update_application(app);
  assert_eq!(uow.commit().await.unwrap(), 1);

  let stored = s.find_application(g.application.id).await.unwrap().unwrap();
  assert_eq!(stored.status, ApplicationStatus::Revoked);
  assert_eq!(stored.date_revoked, Some(revoked_at));
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reference_data_seed_is_an_upsert() {
  let s = store().await;
  s.seed_reference_data(ReferenceDataSet {
    breeds:  vec![Breed { id: 5, name: "Beagle".into(), species_id: 1 }],
    colours: vec![Colour { id: 11, name: "Other".into() }],
  })
  .await
  .unwrap();

  s.seed_reference_data(ReferenceDataSet {
    breeds:  vec![Breed { id: 5, name: "Beagle (UK)".into(), species_id: 1 }],
    colours: vec![],
  })
  .await
  .unwrap();

  let breed = s.find_breed(5).await.unwrap().unwrap();
  assert_eq!(breed.name, "Beagle (UK)");
  assert_eq!(breed.species_id, 1);
  assert_eq!(s.find_colour(11).await.unwrap().unwrap().name, "Other");
  assert!(s.find_breed(6).await.unwrap().is_none());
  assert!(s.find_colour(12).await.unwrap().is_none());
}
