// foodtruck/src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
  pub id: Uuid,
  pub customer_name: String,
  /// Stars, `MIN_RATING..=MAX_RATING`.
  pub rating: i32,
  pub comment: String,
  pub image_url: Option<String>,
  pub created_at: DateTime<Utc>,
}
