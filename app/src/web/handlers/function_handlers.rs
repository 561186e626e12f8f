// foodtruck/src/web/handlers/function_handlers.rs

//! Provider-facing server functions under `/functions`. Failures render as
//! `{error, details?}` with status 500 (401 for authentication).

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::gateway::{PaymentRequest, RemoteLineItem, RemoteOrderRequest};
use crate::state::AppState;
use crate::web::handlers::admin_handlers::AdminSession;

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
  serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))
}

#[derive(Deserialize, Debug)]
pub struct FunctionMenuItem {
  pub square_variation_id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  pub price: Decimal,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOrderLine {
  pub menu_item: FunctionMenuItem,
  pub quantity: u32,
}

#[derive(Deserialize, Debug)]
pub struct FunctionOrder {
  pub id: String,
  pub items: Vec<FunctionOrderLine>,
}

#[derive(Deserialize, Debug)]
pub struct CreateOrderPayload {
  pub order: FunctionOrder,
}

/// `POST /functions/create-order`: mirrors a local order at the provider,
/// keyed by the local order id. Replies with the provider's order JSON.
#[instrument(name = "function::create_order", skip_all)]
pub async fn create_order_function(app_state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
  let result = async {
    let payload: CreateOrderPayload = parse_body(&body)?;
    let request = RemoteOrderRequest {
      idempotency_key: payload.order.id,
      line_items: payload
        .order
        .items
        .into_iter()
        .map(|line| RemoteLineItem {
          name: line.menu_item.name.unwrap_or_else(|| "Menu item".to_string()),
          catalog_object_id: line.menu_item.square_variation_id,
          quantity: line.quantity,
          base_price: line.menu_item.price,
        })
        .collect(),
    };
    app_state.gateway.create_order(&request).await
  }
  .await;

  match result {
    Ok(order) => {
      info!(remote_order_id = %order.id, "Remote order created through server function.");
      HttpResponse::Ok().json(order.raw)
    }
    Err(e) => e.function_response(),
  }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentPayload {
  pub order_id: Option<String>,
  pub nonce: Option<String>,
  pub amount: Option<Decimal>,
}

impl ProcessPaymentPayload {
  fn into_request(self) -> Result<PaymentRequest, AppError> {
    let mut missing = Vec::new();
    let order_id = self.order_id.filter(|s| !s.trim().is_empty());
    let nonce = self.nonce.filter(|s| !s.trim().is_empty());
    if order_id.is_none() {
      missing.push("orderId");
    }
    if nonce.is_none() {
      missing.push("nonce");
    }
    if self.amount.is_none() {
      missing.push("amount");
    }
    match (order_id, nonce, self.amount) {
      (Some(remote_order_id), Some(source_id), Some(amount)) => Ok(PaymentRequest {
        remote_order_id,
        source_id,
        amount,
      }),
      _ => Err(AppError::Validation(format!("Missing required fields: {}", missing.join(", ")))),
    }
  }
}

/// `POST /functions/process-payment`: charges `nonce` against a remote order.
/// Replies with the provider's payment JSON.
#[instrument(name = "function::process_payment", skip_all)]
pub async fn process_payment_function(app_state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
  let result = async {
    let request = parse_body::<ProcessPaymentPayload>(&body)?.into_request()?;
    app_state.gateway.create_payment(&request).await
  }
  .await;

  match result {
    Ok(payment) => {
      info!(payment_id = %payment.id, status = %payment.status, "Payment created through server function.");
      HttpResponse::Ok().json(payment.raw)
    }
    Err(e) => e.function_response(),
  }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricePayload {
  pub square_variation_id: Option<String>,
  pub price: Option<Decimal>,
}

/// `POST /functions/update-square-price`, admin only.
#[instrument(name = "function::update_square_price", skip_all)]
pub async fn update_square_price_function(
  app_state: web::Data<AppState>,
  body: web::Bytes,
  _session: AdminSession,
) -> HttpResponse {
  let result = async {
    let payload: UpdatePricePayload = parse_body(&body)?;
    let (Some(variation_id), Some(price)) = (payload.square_variation_id.filter(|v| !v.is_empty()), payload.price) else {
      return Err(AppError::Validation("Missing required fields".to_string()));
    };
    if price <= Decimal::ZERO {
      return Err(AppError::Validation("Price must be greater than zero".to_string()));
    }
    app_state.gateway.update_variation_price(&variation_id, price).await
  }
  .await;

  match result {
    Ok(updated) => HttpResponse::Ok().json(updated),
    Err(e) => e.function_response(),
  }
}
