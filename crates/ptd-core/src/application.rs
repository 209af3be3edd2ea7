//! Applications and their lifecycle.
//!
//! Status is a closed enumeration internally. The text form (`"Authorised"`,
//! `"AwaitingVerification"`, ...) is the CRM wire format and is only produced
//! or parsed at the edges: payload validation, queue messages, and storage.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result, audit::Audit};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
pub enum ApplicationStatus {
  Authorised,
  Rejected,
  Revoked,
  AwaitingVerification,
  Suspended,
}

impl ApplicationStatus {
  /// Parse the exact wire string. Matching is case-sensitive.
  pub fn parse(raw: &str) -> Result<Self> {
    Self::from_str(raw).map_err(|_| Error::UnknownStatus(raw.to_owned()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
  pub id:                  Uuid,
  pub pet_id:              Uuid,
  pub owner_id:            Uuid,
  pub user_id:             Uuid,
  pub owner_address_id:    Uuid,
  /// Owner details as they were at submission time.
  pub owner_full_name:     String,
  pub owner_phone_number:  Option<String>,
  /// CRM-facing code; `GB` + 8 digits or `GB826AD` + 4 hex digits.
  pub reference_number:    String,
  pub date_of_application: DateTime<Utc>,
  pub status:              ApplicationStatus,
  /// CRM record id used to correlate asynchronous updates.
  pub dynamic_id:          Option<Uuid>,
  pub date_authorised:     Option<DateTime<Utc>>,
  pub date_rejected:       Option<DateTime<Utc>>,
  pub date_revoked:        Option<DateTime<Utc>>,
  pub date_suspended:      Option<DateTime<Utc>>,
  pub date_unsuspended:    Option<DateTime<Utc>>,
  pub audit:               Audit,
}

impl Application {
  /// Move the application to `status`, stamping the matching date column.
  ///
  /// Leaving `Suspended` for any other status stamps `date_unsuspended`.
  pub fn transition(&mut self, status: ApplicationStatus, at: DateTime<Utc>) {
    if self.status == ApplicationStatus::Suspended
      && status != ApplicationStatus::Suspended
    {
      self.date_unsuspended = Some(at);
    }

    match status {
      ApplicationStatus::Authorised => self.date_authorised = Some(at),
      ApplicationStatus::Rejected => self.date_rejected = Some(at),
      ApplicationStatus::Revoked => self.date_revoked = Some(at),
      ApplicationStatus::Suspended => self.date_suspended = Some(at),
      ApplicationStatus::AwaitingVerification => {}
    }

    self.status = status;
  }
}
