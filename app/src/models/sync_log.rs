// foodtruck/src/models/sync_log.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SyncLog {
  pub id: Uuid,
  pub sync_type: String,
  /// `in_progress`, `completed` or `failed`.
  pub status: String,
  pub details: serde_json::Value,
  pub started_at: DateTime<Utc>,
  pub completed_at: Option<DateTime<Utc>>,
}
