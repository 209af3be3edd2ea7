//! Core types and trait definitions for the pet travel document backend.
//!
//! This crate is deliberately free of transport and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod address;
pub mod application;
pub mod audit;
pub mod error;
pub mod limits;
pub mod offline;
pub mod owner;
pub mod pet;
pub mod reference;
pub mod store;
pub mod travel_document;
pub mod unit_of_work;
pub mod user;

pub use error::{Error, Result};
pub use unit_of_work::{Change, ChangeSet, UnitOfWork};
