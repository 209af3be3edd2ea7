//! Email redaction for assisted-digital submissions.
//!
//! Owner and applicant emails are replaced with a synthetic address derived
//! from the travel document reference before the payload is ingested.

use ptd_core::offline::OfflineApplication;

/// `ad.blank.email.{document_reference}@example.com`. An empty reference
/// yields `ad.blank.email.@example.com`.
pub fn redacted_email(document_reference: &str) -> String {
  format!("ad.blank.email.{document_reference}@example.com")
}

/// Overwrite the owner and applicant emails, where those sections exist.
pub fn redact_emails(payload: &mut OfflineApplication) {
  let email = redacted_email(payload.document_reference_number().unwrap_or_default());

  if let Some(owner) = payload.owner.as_mut() {
    owner.email = Some(email.clone());
  }
  if let Some(applicant) = payload.applicant.as_mut() {
    applicant.email = Some(email);
  }
}
