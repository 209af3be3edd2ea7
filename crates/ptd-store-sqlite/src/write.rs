//! Row writers for each staged [`Change`].
//!
//! Called on the database thread inside an open transaction; any error
//! returned here aborts the whole change set.

use ptd_core::{
  Change,
  address::Address,
  application::Application,
  owner::Owner,
  pet::Pet,
  travel_document::TravelDocument,
  user::User,
};
use rusqlite::{Connection, params};

use crate::encode::{encode_audit, encode_dt, encode_opt_dt, encode_opt_uuid, encode_uuid};

/// Write one change. Returns the number of rows affected.
pub fn write_change(conn: &Connection, change: &Change) -> rusqlite::Result<usize> {
  match change {
    Change::AddAddress(address) => insert_address(conn, address),
    Change::AddUser(user) => insert_user(conn, user),
    Change::UpdateUser(user) => expect_row(update_user(conn, user)?),
    Change::AddOwner(owner) => insert_owner(conn, owner),
    Change::AddPet(pet) => insert_pet(conn, pet),
    Change::AddApplication(application) => insert_application(conn, application),
    Change::UpdateApplication(application) => {
      expect_row(update_application(conn, application)?)
    }
    Change::AddTravelDocument(document) => insert_travel_document(conn, document),
  }
}

/// An update that matched nothing means the staged entity never existed.
fn expect_row(affected: usize) -> rusqlite::Result<usize> {
  if affected == 0 {
    return Err(rusqlite::Error::QueryReturnedNoRows);
  }
  Ok(affected)
}

fn insert_address(conn: &Connection, a: &Address) -> rusqlite::Result<usize> {
  let audit = encode_audit(&a.audit);
  conn.execute(
    "INSERT INTO addresses (
       address_id, address_line_one, address_line_two, town_or_city, county,
       post_code, country, address_type, is_active,
       created_by, created_on, updated_by, updated_on
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    params![
      encode_uuid(a.id),
      a.address_line_one,
      a.address_line_two,
      a.town_or_city,
      a.county,
      a.post_code,
      a.country,
      a.address_type.as_ref(),
      a.is_active,
      audit.created_by,
      audit.created_on,
      audit.updated_by,
      audit.updated_on,
    ],
  )
}

fn insert_user(conn: &Connection, u: &User) -> rusqlite::Result<usize> {
  let audit = encode_audit(&u.audit);
  conn.execute(
    "INSERT INTO users (
       user_id, full_name, first_name, last_name, email, telephone,
       contact_id, address_id, role,
       created_by, created_on, updated_by, updated_on
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    params![
      encode_uuid(u.id),
      u.full_name,
      u.first_name,
      u.last_name,
      u.email,
      u.telephone,
      encode_opt_uuid(u.contact_id),
      encode_opt_uuid(u.address_id),
      u.role,
      audit.created_by,
      audit.created_on,
      audit.updated_by,
      audit.updated_on,
    ],
  )
}

fn update_user(conn: &Connection, u: &User) -> rusqlite::Result<usize> {
  let audit = encode_audit(&u.audit);
  conn.execute(
    "UPDATE users SET
       full_name = ?2, first_name = ?3, last_name = ?4, email = ?5,
       telephone = ?6, contact_id = ?7, address_id = ?8, role = ?9,
       updated_by = ?10, updated_on = ?11
     WHERE user_id = ?1",
    params![
      encode_uuid(u.id),
      u.full_name,
      u.first_name,
      u.last_name,
      u.email,
      u.telephone,
      encode_opt_uuid(u.contact_id),
      encode_opt_uuid(u.address_id),
      u.role,
      audit.updated_by,
      audit.updated_on,
    ],
  )
}

fn insert_owner(conn: &Connection, o: &Owner) -> rusqlite::Result<usize> {
  let audit = encode_audit(&o.audit);
  conn.execute(
    "INSERT INTO owners (
       owner_id, full_name, email, telephone, address_id, owner_type,
       charity_name, created_by, created_on, updated_by, updated_on
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    params![
      encode_uuid(o.id),
      o.full_name,
      o.email,
      o.telephone,
      encode_uuid(o.address_id),
      o.owner_type,
      o.charity_name,
      audit.created_by,
      audit.created_on,
      audit.updated_by,
      audit.updated_on,
    ],
  )
}

fn insert_pet(conn: &Connection, p: &Pet) -> rusqlite::Result<usize> {
  let audit = encode_audit(&p.audit);
  conn.execute(
    "INSERT INTO pets (
       pet_id, name, species_id, breed_id,
       additional_info_mixed_breed_or_unknown, sex_id, date_of_birth,
       colour_id, other_colour, microchip_number, microchipped_date,
       has_unique_feature, unique_feature_description,
       created_by, created_on, updated_by, updated_on
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    params![
      encode_uuid(p.id),
      p.name,
      p.species.id(),
      p.breed_id,
      p.additional_info_mixed_breed_or_unknown,
      p.sex.id(),
      encode_opt_dt(p.date_of_birth),
      p.colour_id,
      p.other_colour,
      p.microchip_number,
      encode_opt_dt(p.microchipped_date),
      p.has_unique_feature,
      p.unique_feature_description,
      audit.created_by,
      audit.created_on,
      audit.updated_by,
      audit.updated_on,
    ],
  )
}

fn insert_application(conn: &Connection, a: &Application) -> rusqlite::Result<usize> {
  let audit = encode_audit(&a.audit);
  conn.execute(
    "INSERT INTO applications (
       application_id, pet_id, owner_id, user_id, owner_address_id,
       owner_full_name, owner_phone_number, reference_number,
       date_of_application, status, dynamic_id, date_authorised,
       date_rejected, date_revoked, date_suspended, date_unsuspended,
       created_by, created_on, updated_by, updated_on
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
               ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
    params![
      encode_uuid(a.id),
      encode_uuid(a.pet_id),
      encode_uuid(a.owner_id),
      encode_uuid(a.user_id),
      encode_uuid(a.owner_address_id),
      a.owner_full_name,
      a.owner_phone_number,
      a.reference_number,
      encode_dt(a.date_of_application),
      a.status.as_ref(),
      encode_opt_uuid(a.dynamic_id),
      encode_opt_dt(a.date_authorised),
      encode_opt_dt(a.date_rejected),
      encode_opt_dt(a.date_revoked),
      encode_opt_dt(a.date_suspended),
      encode_opt_dt(a.date_unsuspended),
      audit.created_by,
      audit.created_on,
      audit.updated_by,
      audit.updated_on,
    ],
  )
}

fn update_application(conn: &Connection, a: &Application) -> rusqlite::Result<usize> {
  let audit = encode_audit(&a.audit);
  conn.execute(
    "UPDATE applications SET
       status = ?2, dynamic_id = ?3, date_authorised = ?4, date_rejected = ?5,
       date_revoked = ?6, date_suspended = ?7, date_unsuspended = ?8,
       updated_by = ?9, updated_on = ?10
     WHERE application_id = ?1",
    params![
      encode_uuid(a.id),
      a.status.as_ref(),
      encode_opt_uuid(a.dynamic_id),
      encode_opt_dt(a.date_authorised),
      encode_opt_dt(a.date_rejected),
      encode_opt_dt(a.date_revoked),
      encode_opt_dt(a.date_suspended),
      encode_opt_dt(a.date_unsuspended),
      audit.updated_by,
      audit.updated_on,
    ],
  )
}

fn insert_travel_document(conn: &Connection, t: &TravelDocument) -> rusqlite::Result<usize> {
  let audit = encode_audit(&t.audit);
  conn.execute(
    "INSERT INTO travel_documents (
       travel_document_id, application_id, owner_id, pet_id,
       document_reference_number, qr_code, is_life_time, valid_from, valid_to,
       created_by, created_on, updated_by, updated_on
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    params![
      encode_uuid(t.id),
      encode_uuid(t.application_id),
      encode_uuid(t.owner_id),
      encode_uuid(t.pet_id),
      t.document_reference_number,
      t.qr_code,
      t.is_life_time,
      encode_opt_dt(t.valid_from),
      encode_opt_dt(t.valid_to),
      audit.created_by,
      audit.created_on,
      audit.updated_by,
      audit.updated_on,
    ],
  )
}
