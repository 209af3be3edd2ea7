//! The persistence gateway traits.
//!
//! Implemented by storage backends (e.g. `ptd-store-sqlite`). The validator
//! depends only on [`ReferenceData`]; the ingestion workflow and queue
//! adapter depend on [`PetTravelStore`].
//!
//! Reads always observe committed state. Writes never go through the store
//! directly: they are staged on a [`UnitOfWork`] and handed to
//! [`PetTravelStore::apply`] as one atomic [`ChangeSet`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  address::Address,
  application::Application,
  owner::Owner,
  pet::Pet,
  reference::{Breed, Colour},
  travel_document::TravelDocument,
  unit_of_work::{ChangeSet, UnitOfWork},
  user::User,
};

// ─── Reference data ──────────────────────────────────────────────────────────

/// Lookups against breed and colour reference tables.
pub trait ReferenceData: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn find_breed(
    &self,
    id: i32,
  ) -> impl Future<Output = Result<Option<Breed>, Self::Error>> + Send + '_;

  fn find_colour(
    &self,
    id: i32,
  ) -> impl Future<Output = Result<Option<Colour>, Self::Error>> + Send + '_;
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Abstraction over the relational store holding the five aggregates.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait PetTravelStore: ReferenceData {
  fn find_address(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Address>, Self::Error>> + Send + '_;

  fn find_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Exact, case-sensitive match on the email column.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn find_user_by_contact_id(
    &self,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_owner(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Owner>, Self::Error>> + Send + '_;

  fn find_pet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Pet>, Self::Error>> + Send + '_;

  fn find_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  fn find_application_by_reference<'a>(
    &'a self,
    reference_number: &'a str,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + 'a;

  /// Look up an application by its CRM record id.
  fn find_application_by_dynamic_id(
    &self,
    dynamic_id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  fn find_travel_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<TravelDocument>, Self::Error>> + Send + '_;

  fn find_travel_document_by_composite_key(
    &self,
    application_id: Uuid,
    owner_id: Uuid,
    pet_id: Uuid,
  ) -> impl Future<Output = Result<Option<TravelDocument>, Self::Error>> + Send + '_;

  /// Apply every change in order, atomically. Either all rows are written
  /// or none are. Returns the number of rows written.
  fn apply(
    &self,
    changes: ChangeSet,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Start a unit of work against this store.
  fn begin(&self) -> UnitOfWork<'_, Self>
  where
    Self: Sized,
  {
    UnitOfWork::new(self)
  }
}
