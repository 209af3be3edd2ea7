//! Queue message adapter for the pet travel document backend.
//!
//! Decodes `{"type", "body"}` envelopes, redacts assisted-digital emails,
//! and hands offline applications to the ingestion workflow. Status updates
//! from the CRM are applied directly through a unit of work. [`drain`] runs
//! a newline-delimited stream of messages and dead-letters failures.

pub mod config;
pub mod drain;
pub mod error;
pub mod message;
pub mod processor;
pub mod redact;

pub use config::WorkerConfig;
pub use drain::{DrainSummary, drain};
pub use error::{QueueError, Result};
pub use message::{ApplicationStatusUpdate, QueueMessage};
pub use processor::{Handled, MessageProcessor};
pub use redact::{redact_emails, redacted_email};

#[cfg(test)]
mod tests;
