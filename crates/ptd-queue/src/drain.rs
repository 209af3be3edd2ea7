//! Draining a newline-delimited message stream.

use ptd_core::store::{PetTravelStore, ReferenceData};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::{
  error::{QueueError, Result},
  processor::MessageProcessor,
};

/// Outcome counts for one [`drain`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
  /// Messages handled successfully.
  pub processed: usize,
  /// Messages written to the dead-letter sink.
  pub failed:    usize,
}

/// One dead-lettered message, written as a single JSON line.
#[derive(Debug, Serialize)]
struct DeadLetter<'a> {
  error:   String,
  message: &'a str,
}

/// Handle every non-blank line of `input` in order. Failures are written to
/// `dead_letter` and do not stop the run; only I/O errors do.
pub async fn drain<S, R, I, W>(
  processor: &MessageProcessor<S, R>,
  input: I,
  dead_letter: &mut W,
) -> Result<DrainSummary>
where
  S: PetTravelStore,
  R: ReferenceData,
  I: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  let mut summary = DrainSummary::default();
  let mut lines = input.lines();
  let mut line_no = 0usize;

  while let Some(line) = lines.next_line().await? {
    line_no += 1;
    let raw = line.trim();
    if raw.is_empty() {
      continue;
    }

    match processor.handle(raw).await {
      Ok(handled) => {
        summary.processed += 1;
        info!(line = line_no, ?handled, "message processed");
      }
      Err(e) => {
        summary.failed += 1;
        warn!(line = line_no, error = %e, "message dead-lettered");

        let letter = DeadLetter { error: e.to_string(), message: raw };
        let mut encoded = serde_json::to_vec(&letter).map_err(QueueError::DeadLetter)?;
        encoded.push(b'\n');
        dead_letter.write_all(&encoded).await?;
      }
    }
  }

  dead_letter.flush().await?;
  Ok(summary)
}
