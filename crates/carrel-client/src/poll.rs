//! Background dashboard poller.
//!
//! Refetches sessions and users on a fixed cadence and hands derived
//! snapshots to the console over a channel. Cycles never overlap: each
//! fetch is awaited (with a budget) before the next tick is taken, and a
//! missed tick is skipped rather than bursted.

use std::time::Duration;

use carrel_core::dashboard::DashboardSnapshot;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
  client::ApiClient,
  error::{ApiError, ApiResult},
};

#[derive(Debug, Clone)]
pub struct PollOptions {
  /// Cadence between cycle starts.
  pub interval: Duration,
  /// Per-cycle fetch budget. A cycle that exceeds it reports
  /// [`ApiError::Timeout`] instead of blocking the cadence indefinitely.
  pub budget:   Duration,
}

impl Default for PollOptions {
  fn default() -> Self {
    Self {
      interval: Duration::from_secs(5),
      budget:   Duration::from_secs(5),
    }
  }
}

/// One poll cycle's result, tagged with a monotonically increasing sequence
/// number. Consumers keep the highest `seq` they have applied and drop
/// anything at or below it, so a stale snapshot can never overwrite a
/// fresher one.
#[derive(Debug)]
pub struct PollOutcome {
  pub seq:    u64,
  pub result: ApiResult<DashboardSnapshot>,
}

/// Spawn the poll loop and return its outcome channel.
///
/// The first cycle runs immediately. The loop stops when `shutdown` is
/// cancelled, when the receiver is dropped, or after reporting
/// [`ApiError::Unauthorized`] — an invalidated session cannot recover, so
/// polling on would only repeat the same failure.
pub fn spawn_dashboard_poller(
  client: ApiClient,
  options: PollOptions,
  shutdown: CancellationToken,
) -> mpsc::Receiver<PollOutcome> {
  let (tx, rx) = mpsc::channel(8);
  tokio::spawn(run_poller(client, options, tx, shutdown));
  rx
}

async fn run_poller(
  client: ApiClient,
  options: PollOptions,
  tx: mpsc::Sender<PollOutcome>,
  shutdown: CancellationToken,
) {
  let mut ticker = tokio::time::interval(options.interval);
  ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
  let mut seq: u64 = 0;

  loop {
    tokio::select! {
      biased;

      _ = shutdown.cancelled() => {
        debug!("dashboard poller shutting down");
        return;
      }

      _ = ticker.tick() => {
        let result = tokio::select! {
          biased;
          _ = shutdown.cancelled() => return,
          r = fetch_with_budget(&client, options.budget) => r,
        };

        seq += 1;
        let unauthorized = matches!(result, Err(ApiError::Unauthorized));
        if let Err(e) = &result {
          debug!(error = %e, seq, "poll cycle failed");
        }

        if tx.send(PollOutcome { seq, result }).await.is_err() {
          warn!("dashboard consumer gone, stopping poller");
          return;
        }
        if unauthorized {
          debug!("session invalidated, stopping poller");
          return;
        }
      }
    }
  }
}

async fn fetch_with_budget(
  client: &ApiClient,
  budget: Duration,
) -> ApiResult<DashboardSnapshot> {
  match tokio::time::timeout(budget, client.fetch_dashboard()).await {
    Ok(result) => result,
    Err(_) => Err(ApiError::Timeout),
  }
}
