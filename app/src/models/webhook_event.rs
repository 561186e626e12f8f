// foodtruck/src/models/webhook_event.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Durable log entry of an inbound provider notification.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WebhookEvent {
  pub id: Uuid,
  /// Provider `event_id`, or the SHA-256 of the body when absent.
  pub dedupe_key: String,
  pub event_type: String,
  pub payload: serde_json::Value,
  pub processed: bool,
  pub received_at: DateTime<Utc>,
  pub processed_at: Option<DateTime<Utc>>,
}
