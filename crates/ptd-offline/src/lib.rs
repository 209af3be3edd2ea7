//! Offline (assisted-digital) application pipeline.
//!
//! Two halves:
//!
//! - [`validation`]: checks a raw [`OfflineApplication`] payload against the
//!   field and business rules, with reference-data lookups bounded by a
//!   shared deadline. Never fails; returns an itemised
//!   [`ValidationResult`](validation::ValidationResult).
//! - [`service`]: gates on validation, then writes address, user, owner,
//!   pet, application, and travel document through one unit of work.
//!
//! [`OfflineApplication`]: ptd_core::offline::OfflineApplication

mod mapping;

pub mod error;
pub mod service;
pub mod validation;

pub use error::{IngestError, ProcessingError};
pub use service::OfflineApplicationService;
pub use validation::{MappingValidator, ValidationError, ValidationResult, ValidatorConfig};

#[cfg(test)]
mod test_support;
