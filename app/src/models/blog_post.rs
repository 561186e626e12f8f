// foodtruck/src/models/blog_post.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "blog_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
  Draft,
  Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BlogPost {
  pub id: Uuid,
  pub title: String,
  pub excerpt: Option<String>,
  pub content: String,
  pub image_url: Option<String>,
  pub category: String,
  pub author: String,
  pub status: BlogStatus,
  pub published_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

impl BlogPost {
  /// Date shown on the post; drafts promoted without a stamp fall back to creation time.
  pub fn display_date(&self) -> DateTime<Utc> {
    self.published_at.unwrap_or(self.created_at)
  }
}
