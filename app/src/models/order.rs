// foodtruck/src/models/order.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use super::{Location, MenuItem, OrderItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Preparing,
  Completed,
  Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub location_id: Uuid,
  /// Truck-local wall clock time.
  pub pickup_time: NaiveDateTime,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub square_order_id: Option<String>,
  pub square_payment_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// An order as the admin queue shows it: its location and every line with the item it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
  #[serde(flatten)]
  pub order: Order,
  pub location: Option<Location>,
  pub items: Vec<OrderLineDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderLineDetails {
  #[serde(flatten)]
  pub order_item: OrderItem,
  pub menu_item: Option<MenuItem>,
}

/// Admin listing filter; every field narrows the result when set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
  pub status: Option<OrderStatus>,
  pub location_id: Option<Uuid>,
  pub search: Option<String>,
}

impl OrderFilter {
  /// Search is a case-insensitive match on customer name or order id.
  pub fn matches(&self, order: &Order) -> bool {
    if self.status.is_some_and(|s| s != order.status) {
      return false;
    }
    if self.location_id.is_some_and(|l| l != order.location_id) {
      return false;
    }
    match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
      Some(term) => {
        let term = term.to_lowercase();
        order.customer_name.to_lowercase().contains(&term) || order.id.to_string().contains(&term)
      }
      None => true,
    }
  }
}
