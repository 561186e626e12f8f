// foodtruck/src/models/gallery_item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "gallery_kind_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GalleryKind {
  Food,
  Event,
}

/// A photo on the public gallery page. `location` is free text, not a truck stop id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GalleryItem {
  pub id: Uuid,
  pub title: String,
  pub image_url: String,
  #[serde(rename = "type")]
  #[sqlx(rename = "type")]
  pub kind: GalleryKind,
  pub location: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Admin-editable fields; all four are required.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryItemInput {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub image_url: String,
  #[serde(rename = "type")]
  pub kind: Option<GalleryKind>,
  #[serde(default)]
  pub location: String,
}

/// Gallery listing filter. Search matches title or location, case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryFilter {
  #[serde(rename = "type")]
  pub kind: Option<GalleryKind>,
  pub search: Option<String>,
}

impl GalleryFilter {
  pub fn search_term(&self) -> Option<&str> {
    self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
  }

  pub fn matches(&self, item: &GalleryItem) -> bool {
    if self.kind.is_some_and(|k| k != item.kind) {
      return false;
    }
    match self.search_term() {
      Some(term) => {
        let term = term.to_lowercase();
        item.title.to_lowercase().contains(&term) || item.location.to_lowercase().contains(&term)
      }
      None => true,
    }
  }
}
