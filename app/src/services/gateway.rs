// foodtruck/src/services/gateway.rs

//! The payments provider as seen by the pipelines and server functions.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::errors::{AppError, Result as AppResult};

pub const CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteLineItem {
  pub catalog_object_id: Option<String>,
  pub name: String,
  pub quantity: u32,
  pub base_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteOrderRequest {
  /// The local order id; a repeated call with the same key returns the same remote order.
  pub idempotency_key: String,
  pub line_items: Vec<RemoteLineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
  pub remote_order_id: String,
  /// Card token produced by the provider's browser widget.
  pub source_id: String,
  pub amount: Decimal,
}

impl PaymentRequest {
  pub fn idempotency_key(&self) -> String {
    payment_idempotency_key(&self.remote_order_id)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteOrder {
  pub id: String,
  /// Provider JSON for the order, returned as-is by `create-order`.
  pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemotePayment {
  pub id: String,
  pub status: String,
  pub raw: serde_json::Value,
}

pub fn payment_idempotency_key(remote_order_id: &str) -> String {
  format!("{}_payment", remote_order_id)
}

/// Minor units for the provider: `round(amount * 100)`, halves away from zero.
pub fn to_cents(amount: Decimal) -> AppResult<i64> {
  (amount * Decimal::ONE_HUNDRED)
    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    .to_i64()
    .ok_or_else(|| AppError::Validation(format!("Amount out of range: {}", amount)))
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_order(&self, request: &RemoteOrderRequest) -> AppResult<RemoteOrder>;

  async fn create_payment(&self, request: &PaymentRequest) -> AppResult<RemotePayment>;

  /// Sets the price of a catalog variation, keeping the rest of the object.
  /// Returns the provider's upsert result.
  async fn update_variation_price(&self, variation_id: &str, price: Decimal) -> AppResult<serde_json::Value>;
}
