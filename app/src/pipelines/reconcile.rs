// foodtruck/src/pipelines/reconcile.rs

//! Background sweep for orders that were persisted but never reached the
//! provider, e.g. because the process died between the two writes.

use crate::errors::Result as AppResult;
use crate::state::AppState;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Cancels pending orders without a remote order that are older than the
/// configured grace period. Returns the cancelled ids.
#[instrument(name = "reconcile::sweep", skip(app_state))]
pub async fn cancel_orphaned_orders(app_state: &AppState, now: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
  let cutoff = now - app_state.config.orphan_order_grace;
  let cancelled = app_state.store.cancel_orphaned_orders(cutoff, now).await?;
  if !cancelled.is_empty() {
    info!(count = cancelled.len(), ids = ?cancelled, "Cancelled orphaned pending orders.");
  }
  Ok(cancelled)
}

pub fn spawn_reconciler(app_state: AppState) -> JoinHandle<()> {
  let period = Duration::from_secs(app_state.config.reconcile_interval_secs.max(1));
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(period);
    loop {
      ticker.tick().await;
      if let Err(e) = cancel_orphaned_orders(&app_state, Utc::now()).await {
        error!(error = %e, "Orphan order sweep failed.");
      }
    }
  })
}
