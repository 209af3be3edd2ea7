//! An explicit unit of work.
//!
//! Changes are staged in memory, in the order they are made, and reach the
//! store only through [`UnitOfWork::commit`]. A unit of work that is dropped
//! without committing (for example because a `?` propagated an error out of
//! the function holding it) discards its staged changes: that is the
//! rollback.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  address::Address,
  application::Application,
  owner::Owner,
  pet::Pet,
  store::PetTravelStore,
  travel_document::TravelDocument,
  user::User,
};

// ─── Change set ──────────────────────────────────────────────────────────────

/// A single staged write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
  AddAddress(Address),
  AddUser(User),
  UpdateUser(User),
  AddOwner(Owner),
  AddPet(Pet),
  AddApplication(Application),
  UpdateApplication(Application),
  AddTravelDocument(TravelDocument),
}

impl Change {
  /// Entity name and id, for logging.
  pub fn target(&self) -> (&'static str, Uuid) {
    match self {
      Self::AddAddress(a) => ("address", a.id),
      Self::AddUser(u) | Self::UpdateUser(u) => ("user", u.id),
      Self::AddOwner(o) => ("owner", o.id),
      Self::AddPet(p) => ("pet", p.id),
      Self::AddApplication(a) | Self::UpdateApplication(a) => ("application", a.id),
      Self::AddTravelDocument(t) => ("travel_document", t.id),
    }
  }
}

/// An ordered batch of staged writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
  changes: Vec<Change>,
}

impl ChangeSet {
  pub fn push(&mut self, change: Change) { self.changes.push(change); }

  pub fn len(&self) -> usize { self.changes.len() }

  pub fn is_empty(&self) -> bool { self.changes.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, Change> { self.changes.iter() }
}

impl IntoIterator for ChangeSet {
  type Item = Change;
  type IntoIter = std::vec::IntoIter<Change>;

  fn into_iter(self) -> Self::IntoIter { self.changes.into_iter() }
}

// ─── Unit of work ────────────────────────────────────────────────────────────

/// Staged writes against `S`, committed together or not at all.
pub struct UnitOfWork<'s, S: PetTravelStore> {
  store:   &'s S,
  changes: ChangeSet,
}

impl<'s, S: PetTravelStore> UnitOfWork<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store, changes: ChangeSet::default() } }

  /// The store this unit of work will commit to. Reads through it see
  /// committed state only, never this unit's staged changes.
  pub fn store(&self) -> &'s S { self.store }

  pub fn add_address(&mut self, address: Address) {
    self.changes.push(Change::AddAddress(address));
  }

  pub fn add_user(&mut self, user: User) { self.changes.push(Change::AddUser(user)); }

  pub fn update_user(&mut self, user: User) {
    self.changes.push(Change::UpdateUser(user));
  }

  pub fn add_owner(&mut self, owner: Owner) { self.changes.push(Change::AddOwner(owner)); }

  pub fn add_pet(&mut self, pet: Pet) { self.changes.push(Change::AddPet(pet)); }

  pub fn add_application(&mut self, application: Application) {
    self.changes.push(Change::AddApplication(application));
  }

  pub fn update_application(&mut self, application: Application) {
    self.changes.push(Change::UpdateApplication(application));
  }

  pub fn add_travel_document(&mut self, document: TravelDocument) {
    self.changes.push(Change::AddTravelDocument(document));
  }

  /// Number of staged, uncommitted changes.
  pub fn pending(&self) -> usize { self.changes.len() }

  /// Write every staged change atomically. Returns the rows written.
  pub async fn commit(mut self) -> Result<usize, S::Error> {
    let changes = std::mem::take(&mut self.changes);
    let staged = changes.len();
    let written = self.store.apply(changes).await?;
    debug!(staged, written, "unit of work committed");
    Ok(written)
  }

  /// Discard every staged change.
  pub fn rollback(mut self) { self.discard("rolled back"); }

  fn discard(&mut self, reason: &'static str) {
    if self.changes.is_empty() {
      return;
    }
    let dropped = std::mem::take(&mut self.changes);
    for change in dropped.iter() {
      let (entity, id) = change.target();
      debug!(entity, %id, "discarding staged change");
    }
    warn!(discarded = dropped.len(), "unit of work {reason}");
  }
}

impl<S: PetTravelStore> Drop for UnitOfWork<'_, S> {
  fn drop(&mut self) { self.discard("dropped without commit"); }
}
