//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Reference data. Breed ids 99/100 are sentinels and need not exist here.
CREATE TABLE IF NOT EXISTS breeds (
    breed_id    INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    species_id  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS colours (
    colour_id   INTEGER PRIMARY KEY,
    name        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS addresses (
    address_id        TEXT PRIMARY KEY,
    address_line_one  TEXT NOT NULL,
    address_line_two  TEXT,
    town_or_city      TEXT NOT NULL,
    county            TEXT,
    post_code         TEXT NOT NULL,
    country           TEXT,
    address_type      TEXT NOT NULL,   -- 'Owner' | 'User'
    is_active         INTEGER NOT NULL DEFAULT 1,
    created_by        TEXT,
    created_on        TEXT NOT NULL,
    updated_by        TEXT,
    updated_on        TEXT NOT NULL
);

-- No UNIQUE on email: concurrent first submissions for one applicant can
-- both insert.
CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    full_name   TEXT NOT NULL,
    first_name  TEXT,
    last_name   TEXT,
    email       TEXT NOT NULL,
    telephone   TEXT,
    contact_id  TEXT,
    address_id  TEXT REFERENCES addresses(address_id),
    role        TEXT,
    created_by  TEXT,
    created_on  TEXT NOT NULL,
    updated_by  TEXT,
    updated_on  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS owners (
    owner_id      TEXT PRIMARY KEY,
    full_name     TEXT NOT NULL,
    email         TEXT NOT NULL,
    telephone     TEXT,
    address_id    TEXT NOT NULL REFERENCES addresses(address_id),
    owner_type    TEXT,
    charity_name  TEXT,
    created_by    TEXT,
    created_on    TEXT NOT NULL,
    updated_by    TEXT,
    updated_on    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pets (
    pet_id                                  TEXT PRIMARY KEY,
    name                                    TEXT NOT NULL,
    species_id                              INTEGER NOT NULL,
    breed_id                                INTEGER,
    additional_info_mixed_breed_or_unknown  TEXT,
    sex_id                                  INTEGER NOT NULL,
    date_of_birth                           TEXT,
    colour_id                               INTEGER NOT NULL,
    other_colour                            TEXT,
    microchip_number                        TEXT,
    microchipped_date                       TEXT,
    has_unique_feature                      INTEGER NOT NULL DEFAULT 0,
    unique_feature_description              TEXT,
    created_by                              TEXT,
    created_on                              TEXT NOT NULL,
    updated_by                              TEXT,
    updated_on                              TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    application_id       TEXT PRIMARY KEY,
    pet_id               TEXT NOT NULL REFERENCES pets(pet_id),
    owner_id             TEXT NOT NULL REFERENCES owners(owner_id),
    user_id              TEXT NOT NULL REFERENCES users(user_id),
    owner_address_id     TEXT NOT NULL REFERENCES addresses(address_id),
    owner_full_name      TEXT NOT NULL,
    owner_phone_number   TEXT,
    reference_number     TEXT NOT NULL,
    date_of_application  TEXT NOT NULL,
    status               TEXT NOT NULL,   -- ApplicationStatus wire string
    dynamic_id           TEXT,
    date_authorised      TEXT,
    date_rejected        TEXT,
    date_revoked         TEXT,
    date_suspended       TEXT,
    date_unsuspended     TEXT,
    created_by           TEXT,
    created_on           TEXT NOT NULL,
    updated_by           TEXT,
    updated_on           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS travel_documents (
    travel_document_id         TEXT PRIMARY KEY,
    application_id             TEXT NOT NULL REFERENCES applications(application_id),
    owner_id                   TEXT NOT NULL REFERENCES owners(owner_id),
    pet_id                     TEXT NOT NULL REFERENCES pets(pet_id),
    document_reference_number  TEXT NOT NULL,
    qr_code                    TEXT,
    is_life_time               INTEGER NOT NULL DEFAULT 1,
    valid_from                 TEXT,
    valid_to                   TEXT,
    created_by                 TEXT,
    created_on                 TEXT NOT NULL,
    updated_by                 TEXT,
    updated_on                 TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS users_email_idx            ON users(email);
CREATE INDEX IF NOT EXISTS users_contact_idx          ON users(contact_id);
CREATE INDEX IF NOT EXISTS applications_reference_idx ON applications(reference_number);
CREATE INDEX IF NOT EXISTS applications_dynamic_idx   ON applications(dynamic_id);
CREATE INDEX IF NOT EXISTS travel_documents_key_idx
    ON travel_documents(application_id, owner_id, pet_id);

PRAGMA user_version = 1;
";
