//! [`SqliteStore`]: the SQLite implementation of [`PetTravelStore`].

use std::path::Path;

use ptd_core::{
  ChangeSet,
  address::Address,
  application::Application,
  owner::Owner,
  pet::Pet,
  reference::{Breed, Colour, ReferenceDataSet},
  store::{PetTravelStore, ReferenceData},
  travel_document::TravelDocument,
  user::User,
};
use rusqlite::{OptionalExtension as _, TransactionBehavior, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    ADDRESS_COLUMNS, APPLICATION_COLUMNS, OWNER_COLUMNS, PET_COLUMNS, RawAddress,
    RawApplication, RawOwner, RawPet, RawTravelDocument, RawUser,
    TRAVEL_DOCUMENT_COLUMNS, USER_COLUMNS, breed_from_row, colour_from_row,
    encode_uuid,
  },
  schema::SCHEMA,
  write::write_change,
};

// ─── Entity ──────────────────────────────────────────────────────────────────

/// The persisted aggregates, for diagnostics such as [`SqliteStore::count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  Address,
  User,
  Owner,
  Pet,
  Application,
  TravelDocument,
}

impl Entity {
  fn table(self) -> &'static str {
    match self {
      Self::Address => "addresses",
      Self::User => "users",
      Self::Owner => "owners",
      Self::Pet => "pets",
      Self::Application => "applications",
      Self::TravelDocument => "travel_documents",
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A pet travel document store backed by a single SQLite file.
///
/// Cloning shares the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert or replace breed and colour rows.
  pub async fn seed_reference_data(&self, data: ReferenceDataSet) -> Result<()> {
    let breeds = data.breeds.len();
    let colours = data.colours.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for breed in &data.breeds {
          tx.execute(
            "INSERT INTO breeds (breed_id, name, species_id) VALUES (?1, ?2, ?3)
             ON CONFLICT(breed_id) DO UPDATE SET
               name = excluded.name, species_id = excluded.species_id",
            params![breed.id, breed.name, breed.species_id],
          )?;
        }
        for colour in &data.colours {
          tx.execute(
            "INSERT INTO colours (colour_id, name) VALUES (?1, ?2)
             ON CONFLICT(colour_id) DO UPDATE SET name = excluded.name",
            params![colour.id, colour.name],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    info!(breeds, colours, "reference data seeded");
    Ok(())
  }

  /// Number of rows currently stored for `entity`.
  pub async fn count(&self, entity: Entity) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", entity.table());
    let count: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;
    Ok(u64::try_from(count).unwrap_or_default())
  }

  /// Run `sql` with a single text parameter and decode at most one row.
  async fn query_one<Raw, T>(
    &self,
    sql: String,
    param: String,
    from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<Raw>,
    decode: fn(Raw) -> Result<T>,
  ) -> Result<Option<T>>
  where
    Raw: Send + 'static,
  {
    let raw: Option<Raw> = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, params![param], from_row).optional()?))
      .await?;
    raw.map(decode).transpose()
  }
}

// ─── ReferenceData impl ──────────────────────────────────────────────────────

impl ReferenceData for SqliteStore {
  type Error = crate::Error;

  async fn find_breed(&self, id: i32) -> Result<Option<Breed>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT breed_id, name, species_id FROM breeds WHERE breed_id = ?1",
                params![id],
                breed_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn find_colour(&self, id: i32) -> Result<Option<Colour>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT colour_id, name FROM colours WHERE colour_id = ?1",
                params![id],
                colour_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }
}

// ─── PetTravelStore impl ─────────────────────────────────────────────────────

impl PetTravelStore for SqliteStore {
  async fn find_address(&self, id: Uuid) -> Result<Option<Address>> {
    self
      .query_one(
        format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE address_id = ?1"),
        encode_uuid(id),
        RawAddress::from_row,
        RawAddress::into_address,
      )
      .await
  }

  async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
    self
      .query_one(
        format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
        encode_uuid(id),
        RawUser::from_row,
        RawUser::into_user,
      )
      .await
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    // Oldest row wins should duplicates ever exist.
    self
      .query_one(
        format!(
          "SELECT {USER_COLUMNS} FROM users WHERE email = ?1
           ORDER BY created_on LIMIT 1"
        ),
        email.to_owned(),
        RawUser::from_row,
        RawUser::into_user,
      )
      .await
  }

  async fn find_user_by_contact_id(&self, contact_id: Uuid) -> Result<Option<User>> {
    self
      .query_one(
        format!(
          "SELECT {USER_COLUMNS} FROM users WHERE contact_id = ?1
           ORDER BY created_on LIMIT 1"
        ),
        encode_uuid(contact_id),
        RawUser::from_row,
        RawUser::into_user,
      )
      .await
  }

  async fn find_owner(&self, id: Uuid) -> Result<Option<Owner>> {
    self
      .query_one(
        format!("SELECT {OWNER_COLUMNS} FROM owners WHERE owner_id = ?1"),
        encode_uuid(id),
        RawOwner::from_row,
        RawOwner::into_owner,
      )
      .await
  }

  async fn find_pet(&self, id: Uuid) -> Result<Option<Pet>> {
    self
      .query_one(
        format!("SELECT {PET_COLUMNS} FROM pets WHERE pet_id = ?1"),
        encode_uuid(id),
        RawPet::from_row,
        RawPet::into_pet,
      )
      .await
  }

  async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
    self
      .query_one(
        format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE application_id = ?1"),
        encode_uuid(id),
        RawApplication::from_row,
        RawApplication::into_application,
      )
      .await
  }

  async fn find_application_by_reference<'a>(
    &'a self,
    reference_number: &'a str,
  ) -> Result<Option<Application>> {
    self
      .query_one(
        format!(
          "SELECT {APPLICATION_COLUMNS} FROM applications WHERE reference_number = ?1
           ORDER BY created_on DESC LIMIT 1"
        ),
        reference_number.to_owned(),
        RawApplication::from_row,
        RawApplication::into_application,
      )
      .await
  }

  async fn find_application_by_dynamic_id(
    &self,
    dynamic_id: Uuid,
  ) -> Result<Option<Application>> {
    self
      .query_one(
        format!(
          "SELECT {APPLICATION_COLUMNS} FROM applications WHERE dynamic_id = ?1
           ORDER BY created_on DESC LIMIT 1"
        ),
        encode_uuid(dynamic_id),
        RawApplication::from_row,
        RawApplication::into_application,
      )
      .await
  }

  async fn find_travel_document(&self, id: Uuid) -> Result<Option<TravelDocument>> {
    self
      .query_one(
        format!(
          "SELECT {TRAVEL_DOCUMENT_COLUMNS} FROM travel_documents
           WHERE travel_document_id = ?1"
        ),
        encode_uuid(id),
        RawTravelDocument::from_row,
        RawTravelDocument::into_travel_document,
      )
      .await
  }

  async fn find_travel_document_by_composite_key(
    &self,
    application_id: Uuid,
    owner_id:       Uuid,
    pet_id:         Uuid,
  ) -> Result<Option<TravelDocument>> {
    let sql = format!(
      "SELECT {TRAVEL_DOCUMENT_COLUMNS} FROM travel_documents
       WHERE application_id = ?1 AND owner_id = ?2 AND pet_id = ?3"
    );
    let keys = (encode_uuid(application_id), encode_uuid(owner_id), encode_uuid(pet_id));

    let raw: Option<RawTravelDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              params![keys.0, keys.1, keys.2],
              RawTravelDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTravelDocument::into_travel_document).transpose()
  }

  async fn apply(&self, changes: ChangeSet) -> Result<usize> {
    if changes.is_empty() {
      return Ok(0);
    }
    let staged = changes.len();

    let written = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock up front so the batch cannot fail
        // half way through on a lock upgrade.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut written = 0;
        for change in changes.iter() {
          written += write_change(&tx, change)?;
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;

    debug!(staged, written, "change set applied");
    Ok(written)
  }
}
