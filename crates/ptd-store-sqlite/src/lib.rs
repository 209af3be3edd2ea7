//! SQLite backend for the pet travel document store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;
mod write;

pub mod error;

pub use error::{Error, Result};
pub use store::{Entity, SqliteStore};

#[cfg(test)]
mod tests;
