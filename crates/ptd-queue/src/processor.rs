//! Turns one raw queue message into store writes.

use chrono::Utc;
use ptd_core::{
  application::ApplicationStatus,
  store::{PetTravelStore, ReferenceData},
};
use ptd_offline::OfflineApplicationService;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  error::{QueueError, Result},
  message::{ApplicationStatusUpdate, QueueMessage},
  redact::redact_emails,
};

/// What a successfully handled message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
  Ingested { reference: String },
  StatusUpdated { application_id: Uuid, status: ApplicationStatus },
}

pub struct MessageProcessor<S, R = S> {
  service: OfflineApplicationService<S, R>,
}

impl<S, R> MessageProcessor<S, R>
where
  S: PetTravelStore,
  R: ReferenceData,
{
  pub fn new(service: OfflineApplicationService<S, R>) -> Self { Self { service } }

  pub fn service(&self) -> &OfflineApplicationService<S, R> { &self.service }

  /// Decode and handle one message. No retries: a failure is returned to
  /// the caller for dead-lettering.
  pub async fn handle(&self, raw: &str) -> Result<Handled> {
    match QueueMessage::decode(raw)? {
      QueueMessage::OfflineApplication(mut payload) => {
        if let Some(payload) = payload.as_mut() {
          redact_emails(payload);
        }
        let reference = payload
          .as_ref()
          .and_then(|p| p.reference_number())
          .unwrap_or_default()
          .to_owned();
        debug!(%reference, "handling offline application");

        self.service.process(payload.as_ref()).await?;
        Ok(Handled::Ingested { reference })
      }
      QueueMessage::ApplicationStatus(update) => self.update_status(update).await,
    }
  }

  async fn update_status(&self, update: ApplicationStatusUpdate) -> Result<Handled> {
    let status = ApplicationStatus::parse(&update.status)?;
    let store = self.service.store();

    let mut application = store
      .find_application_by_dynamic_id(update.dynamic_id)
      .await
      .map_err(QueueError::store)?
      .ok_or(QueueError::ApplicationNotFound(update.dynamic_id))?;

    let now = Utc::now();
    application.transition(status, update.status_date.unwrap_or(now));
    application.audit.touch(None, now);
    let application_id = application.id;

    let mut uow = store.begin();
    uow.update_application(application);
    uow.commit().await.map_err(QueueError::store)?;

    info!(%application_id, dynamic_id = %update.dynamic_id, %status, "application status updated");
    Ok(Handled::StatusUpdated { application_id, status })
  }
}
