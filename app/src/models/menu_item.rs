// foodtruck/src/models/menu_item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Menu sections, in the order the ordering wizard walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "menu_category_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
  Signatures,
  Vegetarian,
  Sides,
  Drinks,
  Combos,
  Dessert,
  Extras,
}

impl MenuCategory {
  pub const ALL: [MenuCategory; 7] = [
    MenuCategory::Signatures,
    MenuCategory::Vegetarian,
    MenuCategory::Sides,
    MenuCategory::Drinks,
    MenuCategory::Combos,
    MenuCategory::Dessert,
    MenuCategory::Extras,
  ];

  pub fn first() -> Self {
    Self::ALL[0]
  }

  pub fn last() -> Self {
    Self::ALL[Self::ALL.len() - 1]
  }

  fn index(self) -> usize {
    Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
  }

  pub fn next(self) -> Option<Self> {
    Self::ALL.get(self.index() + 1).copied()
  }

  pub fn previous(self) -> Option<Self> {
    self.index().checked_sub(1).map(|i| Self::ALL[i])
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub category: MenuCategory,
  pub is_vegetarian: bool,
  pub is_spicy: bool,
  pub is_gluten_free: bool,
  pub display_order: i32,
  pub image_url: Option<String>,
  pub square_item_id: Option<String>,
  pub square_variation_id: Option<String>,
  pub square_stock: Option<i64>,
  pub last_synced_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
