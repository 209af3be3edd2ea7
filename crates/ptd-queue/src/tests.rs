//! End-to-end tests of the message processor and drain loop against an
//! in-memory SQLite store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use ptd_core::{
  application::ApplicationStatus,
  reference::{Breed, Colour, ReferenceDataSet},
  store::PetTravelStore,
};
use ptd_offline::{MappingValidator, OfflineApplicationService, ProcessingError};
use ptd_store_sqlite::{Entity, SqliteStore};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{DrainSummary, Handled, MessageProcessor, QueueError, drain};

async fn processor() -> MessageProcessor<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  store
    .seed_reference_data(ReferenceDataSet {
      breeds:  vec![Breed { id: 7, name: "Labrador".into(), species_id: 1 }],
      colours: vec![Colour { id: 3, name: "Black".into() }],
    })
    .await
    .expect("seed");

  let store = Arc::new(store);
  let validator = MappingValidator::new(Arc::clone(&store));
  MessageProcessor::new(OfflineApplicationService::new(store, validator))
}

fn store(processor: &MessageProcessor<SqliteStore>) -> &SqliteStore {
  processor.service().store()
}

fn offline_body(reference: &str, dynamic_id: Uuid) -> Value {
  json!({
    "OwnerAddress": {
      "AddressLineOne": "1 High Street",
      "AddressLineTwo": "NULL",
      "TownOrCity": "Bristol",
      "PostCode": "BS1 4DJ"
    },
    "Owner": {
      "FullName": "Olive Owner",
      "Email": "olive@owner.test",
      "Telephone": "01234 567890"
    },
    "Applicant": {
      "FullName": "Sam Applicant",
      "Email": "sam@applicant.test"
    },
    "Pet": {
      "Name": "Rex",
      "SpeciesId": 1,
      "BreedId": 7,
      "SexId": 2,
      "ColourId": 3,
      "DateOfBirth": "2020-01-01T00:00:00Z"
    },
    "Application": {
      "ReferenceNumber": reference,
      "DateOfApplication": "2024-05-01T09:00:00Z",
      "Status": "Authorised",
      "DateAuthorised": "2024-05-02T10:00:00Z",
      "DynamicId": dynamic_id.to_string()
    },
    "Ptd": { "DocumentReferenceNumber": reference }
  })
}

fn offline_message(body: Value) -> String {
  json!({ "type": "offline_application", "body": body }).to_string()
}

fn status_message(dynamic_id: Uuid, status: &str, at: Option<&str>) -> String {
  json!({
    "type": "application_status",
    "body": { "DynamicId": dynamic_id.to_string(), "Status": status, "StatusDate": at }
  })
  .to_string()
}

#[tokio::test]
async fn offline_application_is_ingested_with_redacted_emails() {
  let processor = processor().await;
  let raw = offline_message(offline_body("GB12345678", Uuid::new_v4()));

  let handled = processor.handle(&raw).await.unwrap();
  assert_eq!(handled, Handled::Ingested { reference: "GB12345678".into() });

  let store = store(&processor);
  let redacted = "ad.blank.email.GB12345678@example.com";
  assert!(store.find_user_by_email("sam@applicant.test").await.unwrap().is_none());
  let user = store.find_user_by_email(redacted).await.unwrap().expect("user stored");
  assert_eq!(user.full_name, "Sam Applicant");

  let application = store
    .find_application_by_reference("GB12345678")
    .await
    .unwrap()
    .unwrap();
  let owner = store.find_owner(application.owner_id).await.unwrap().unwrap();
  assert_eq!(owner.email, redacted);
}

#[tokio::test]
async fn empty_document_reference_fails_on_the_reference_only() {
  let processor = processor().await;
  let mut body = offline_body("GB12345678", Uuid::new_v4());
  body["Ptd"]["DocumentReferenceNumber"] = json!("");

  let err = processor.handle(&offline_message(body)).await.unwrap_err();
  let text = err.to_string();
  assert!(text.starts_with("Validation failed: "), "{text}");
  assert!(text.contains("DocumentReferenceNumber"));
  // The redacted `ad.blank.email.@example.com` is still a valid address.
  assert!(!text.contains("OwnerEmail"), "{text}");
  assert!(!text.contains("ApplicantEmail"), "{text}");
}

#[tokio::test]
async fn null_body_reaches_the_validator() {
  let processor = processor().await;
  let err = processor
    .handle(r#"{"type":"offline_application","body":null}"#)
    .await
    .unwrap_err();
  assert!(matches!(err, QueueError::Processing(ProcessingError::Validation(_))));
  assert_eq!(err.to_string(), "Validation failed: Model: Request model cannot be null");
}

#[tokio::test]
async fn malformed_messages_are_format_errors() {
  let processor = processor().await;
  for raw in ["not json", r#"{"body":{}}"#, r#"{"type":"offline_application","body":"text"}"#] {
    let err = processor.handle(raw).await.unwrap_err();
    assert!(
      err.to_string().starts_with("Invalid message format: "),
      "{raw}: {err}"
    );
  }
}

#[tokio::test]
async fn status_updates_stamp_lifecycle_dates() {
  let processor = processor().await;
  let dynamic_id = Uuid::new_v4();
  processor
    .handle(&offline_message(offline_body("GB826AD1F2E", dynamic_id)))
    .await
    .unwrap();

  let handled = processor
    .handle(&status_message(dynamic_id, "Suspended", Some("2024-06-01T00:00:00Z")))
    .await
    .unwrap();
  assert!(matches!(
    handled,
    Handled::StatusUpdated { status: ApplicationStatus::Suspended, .. }
  ));

  let store = store(&processor);
  let application = store
    .find_application_by_dynamic_id(dynamic_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(application.status, ApplicationStatus::Suspended);
  assert_eq!(
    application.date_suspended,
    Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
  );

  processor
    .handle(&status_message(dynamic_id, "Authorised", Some("2024-07-01T00:00:00Z")))
    .await
    .unwrap();
  let application = store
    .find_application_by_dynamic_id(dynamic_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(application.status, ApplicationStatus::Authorised);
  assert_eq!(
    application.date_unsuspended,
    Some(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap())
  );
}

#[tokio::test]
async fn status_update_errors() {
  let processor = processor().await;
  let dynamic_id = Uuid::new_v4();

  let err = processor
    .handle(&status_message(dynamic_id, "Revoked", None))
    .await
    .unwrap_err();
  assert!(matches!(err, QueueError::ApplicationNotFound(id) if id == dynamic_id));

  let err = processor
    .handle(&status_message(dynamic_id, "Approved", None))
    .await
    .unwrap_err();
  assert!(matches!(err, QueueError::Core(ptd_core::Error::UnknownStatus(_))));
}

#[tokio::test]
async fn drain_dead_letters_failures_and_keeps_going() {
  let processor = processor().await;
  let input = [
    offline_message(offline_body("GB12345678", Uuid::new_v4())),
    String::new(),
    "garbage".to_owned(),
    status_message(Uuid::new_v4(), "Revoked", None),
    offline_message(offline_body("GB87654321", Uuid::new_v4())),
  ]
  .join("\n");

  let mut dead_letter = Vec::new();
  let summary = drain(&processor, input.as_bytes(), &mut dead_letter)
    .await
    .unwrap();

  assert_eq!(summary, DrainSummary { processed: 2, failed: 2 });
  assert_eq!(store(&processor).count(Entity::Application).await.unwrap(), 2);

  let letters: Vec<Value> = String::from_utf8(dead_letter)
    .unwrap()
    .lines()
    .map(|l| serde_json::from_str(l).unwrap())
    .collect();
  assert_eq!(letters.len(), 2);
  assert_eq!(letters[0]["message"], "garbage");
  assert!(
    letters[0]["error"]
      .as_str()
      .unwrap()
      .starts_with("Invalid message format: ")
  );
  assert!(
    letters[1]["error"]
      .as_str()
      .unwrap()
      .starts_with("No application found for dynamic id")
  );
}
