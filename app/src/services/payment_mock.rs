// foodtruck/src/services/payment_mock.rs

//! In-process stand-in for the payments provider. Honors idempotency keys the
//! way the real API does, so replays return the original object.

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result as AppResult};
use crate::services::gateway::{
  to_cents, PaymentGateway, PaymentRequest, RemoteOrder, RemoteOrderRequest, RemotePayment, CURRENCY,
};

/// Card token the mock always declines (the provider's sandbox decline nonce).
pub const DECLINED_NONCE: &str = "cnon:card-nonce-declined";

#[derive(Default)]
pub struct MockGateway {
  orders: Mutex<HashMap<String, RemoteOrder>>,
  payments: Mutex<HashMap<String, RemotePayment>>,
  catalog_prices: Mutex<HashMap<String, i64>>,
  orders_created: AtomicUsize,
  payments_created: AtomicUsize,
  fail_orders: AtomicBool,
}

impl MockGateway {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every following `create_order` fail, to exercise failure paths.
  pub fn fail_orders(&self, fail: bool) {
    self.fail_orders.store(fail, Ordering::SeqCst);
  }

  pub fn orders_created(&self) -> usize {
    self.orders_created.load(Ordering::SeqCst)
  }

  pub fn payments_created(&self) -> usize {
    self.payments_created.load(Ordering::SeqCst)
  }

  pub fn catalog_price_cents(&self, variation_id: &str) -> Option<i64> {
    self.catalog_prices.lock().get(variation_id).copied()
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  #[instrument(name = "mock_gateway::create_order", skip_all, fields(idempotency_key = %request.idempotency_key))]
  async fn create_order(&self, request: &RemoteOrderRequest) -> AppResult<RemoteOrder> {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    if self.fail_orders.load(Ordering::SeqCst) {
      return Err(AppError::Provider {
        message: "Mock provider unavailable".to_string(),
        details: Some(json!([{ "category": "API_ERROR", "code": "SERVICE_UNAVAILABLE" }])),
      });
    }

    let mut orders = self.orders.lock();
    if let Some(existing) = orders.get(&request.idempotency_key) {
      info!(remote_order_id = %existing.id, "Replayed idempotency key, returning existing order.");
      return Ok(existing.clone());
    }

    let mut line_items = Vec::with_capacity(request.line_items.len());
    let mut total_cents = 0;
    for line in &request.line_items {
      let cents = to_cents(line.base_price)?;
      total_cents += cents * i64::from(line.quantity);
      line_items.push(json!({
        "catalog_object_id": line.catalog_object_id,
        "name": line.name,
        "quantity": line.quantity.to_string(),
        "base_price_money": { "amount": cents, "currency": CURRENCY },
      }));
    }
    let id = format!("mock_order_{}", Uuid::new_v4().simple());
    let order = RemoteOrder {
      id: id.clone(),
      raw: json!({
        "id": id,
        "state": "OPEN",
        "reference_id": request.idempotency_key,
        "line_items": line_items,
        "total_money": { "amount": total_cents, "currency": CURRENCY },
      }),
    };
    orders.insert(request.idempotency_key.clone(), order.clone());
    self.orders_created.fetch_add(1, Ordering::SeqCst);
    info!(remote_order_id = %order.id, "Mock order created.");
    Ok(order)
  }

  #[instrument(name = "mock_gateway::create_payment", skip_all, fields(remote_order_id = %request.remote_order_id))]
  async fn create_payment(&self, request: &PaymentRequest) -> AppResult<RemotePayment> {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    if request.source_id == DECLINED_NONCE {
      return Err(AppError::Provider {
        message: "Card declined".to_string(),
        details: Some(json!([{ "category": "PAYMENT_METHOD_ERROR", "code": "GENERIC_DECLINE" }])),
      });
    }
    let key = request.idempotency_key();
    let mut payments = self.payments.lock();
    if let Some(existing) = payments.get(&key) {
      return Ok(existing.clone());
    }

    let id = format!("mock_payment_{}", Uuid::new_v4().simple());
    let payment = RemotePayment {
      id: id.clone(),
      status: "COMPLETED".to_string(),
      raw: json!({
        "id": id,
        "status": "COMPLETED",
        "order_id": request.remote_order_id,
        "amount_money": { "amount": to_cents(request.amount)?, "currency": CURRENCY },
      }),
    };
    payments.insert(key, payment.clone());
    self.payments_created.fetch_add(1, Ordering::SeqCst);
    Ok(payment)
  }

  async fn update_variation_price(&self, variation_id: &str, price: Decimal) -> AppResult<Value> {
    let cents = to_cents(price)?;
    self.catalog_prices.lock().insert(variation_id.to_string(), cents);
    Ok(json!({
      "catalog_object": {
        "type": "ITEM_VARIATION",
        "id": variation_id,
        "item_variation_data": { "price_money": { "amount": cents, "currency": CURRENCY } },
      },
    }))
  }
}
