// foodtruck/src/pipelines/contexts.rs

//! Root data of every pipeline. Handlers receive these wrapped in
//! `orderflow::ContextData`.

use crate::domain::{Cart, SubmitOrderRequest};
use crate::models::{Location, Order, OrderItem};
use crate::state::AppState;
use actix_web::web::Bytes;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone)]
pub struct SubmitOrderCtxData {
  pub app_state: AppState,
  pub request: SubmitOrderRequest,
  /// Set by `validate_submission`.
  pub location: Option<Location>,
  pub pickup_time: Option<NaiveDateTime>,
  /// Authoritative cart, rebuilt from stored prices.
  pub cart: Cart,
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
  pub order_id: Option<Uuid>,
  pub remote_order_id: Option<String>,
}

impl SubmitOrderCtxData {
  pub fn new(app_state: AppState, request: SubmitOrderRequest) -> Self {
    Self {
      app_state,
      request,
      location: None,
      pickup_time: None,
      cart: Cart::new(),
      subtotal: Decimal::ZERO,
      tax: Decimal::ZERO,
      total: Decimal::ZERO,
      order_id: None,
      remote_order_id: None,
    }
  }
}

/// Reply of `POST /api/v1/orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
  pub order_id: Uuid,
  pub remote_order_id: String,
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
  pub pickup_time: NaiveDateTime,
}

#[derive(Clone)]
pub struct CapturePaymentCtxData {
  pub app_state: AppState,
  pub order_id: Uuid,
  pub nonce: String,
  pub order: Option<Order>,
  pub items: Vec<OrderItem>,
  pub remote_order_id: Option<String>,
  pub payment_id: Option<String>,
  pub confirmation: Option<OrderConfirmation>,
}

impl CapturePaymentCtxData {
  pub fn new(app_state: AppState, order_id: Uuid, nonce: String) -> Self {
    Self {
      app_state,
      order_id,
      nonce,
      order: None,
      items: Vec::new(),
      remote_order_id: None,
      payment_id: None,
      confirmation: None,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationLine {
  pub menu_item_id: Uuid,
  pub name: String,
  pub quantity: i32,
  pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationCustomer {
  pub name: String,
  pub email: String,
  pub phone: String,
}

/// Snapshot shown on the confirmation page after a successful charge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
  pub order_id: Uuid,
  pub remote_order_id: String,
  pub payment_id: String,
  pub customer: ConfirmationCustomer,
  pub items: Vec<ConfirmationLine>,
  pub pickup_time: NaiveDateTime,
  pub total: Decimal,
  pub location_name: String,
}

#[derive(Clone)]
pub struct SquareWebhookCtxData {
  pub app_state: AppState,
  pub raw_payload: Bytes,
  pub signature_header: Option<String>,
  pub event_id: Option<Uuid>,
  pub event_type: Option<String>,
  pub payload: Option<serde_json::Value>,
  /// Set when the event was already processed; the run stops without side effects.
  pub duplicate: bool,
}

impl SquareWebhookCtxData {
  pub fn new(app_state: AppState, raw_payload: Bytes, signature_header: Option<String>) -> Self {
    Self {
      app_state,
      raw_payload,
      signature_header,
      event_id: None,
      event_type: None,
      payload: None,
      duplicate: false,
    }
  }
}
