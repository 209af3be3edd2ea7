//! A deadline threaded explicitly through a validation run.

use std::time::Duration;

use tokio::time::Instant;

/// The point in time a validation run must finish by.
///
/// Each reference-data lookup gets `min(per_call, remaining)`, so no single
/// lookup can outlive the run that started it.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
  at: Instant,
}

impl Deadline {
  pub fn after(budget: Duration) -> Self { Self { at: Instant::now() + budget } }

  pub fn instant(&self) -> Instant { self.at }

  pub fn remaining(&self) -> Duration { self.at.saturating_duration_since(Instant::now()) }

  /// The timeout to apply to one call that would like `per_call`.
  pub fn budget(&self, per_call: Duration) -> Duration { per_call.min(self.remaining()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test(start_paused = true)]
  async fn budget_is_capped_by_remaining_time() {
    let deadline = Deadline::after(Duration::from_secs(30));
    assert_eq!(deadline.budget(Duration::from_secs(5)), Duration::from_secs(5));

    tokio::time::advance(Duration::from_secs(28)).await;
    assert_eq!(deadline.budget(Duration::from_secs(5)), Duration::from_secs(2));

    tokio::time::advance(Duration::from_secs(10)).await;
    assert_eq!(deadline.remaining(), Duration::ZERO);
    assert_eq!(deadline.budget(Duration::from_secs(5)), Duration::ZERO);
  }
}
