// foodtruck/src/services/square.rs

//! Square REST client (orders, payments, catalog).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::config::SquareConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::services::gateway::{
  to_cents, PaymentGateway, PaymentRequest, RemoteOrder, RemoteOrderRequest, RemotePayment, CURRENCY,
};

#[derive(Clone)]
pub struct SquareClient {
  client: Client,
  base_url: String,
  access_token: String,
  api_version: String,
  location_id: String,
}

impl SquareClient {
  pub fn new(config: &SquareConfig) -> Self {
    Self {
      client: Client::new(),
      base_url: config.api_url.trim_end_matches('/').to_string(),
      access_token: config.access_token.clone(),
      api_version: config.api_version.clone(),
      location_id: config.location_id.clone(),
    }
  }

  fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
    self
      .client
      .request(method, format!("{}{}", self.base_url, path))
      .header("Authorization", format!("Bearer {}", self.access_token))
      .header("Square-Version", &self.api_version)
      .header("Accept", "application/json")
  }

  /// Decodes a provider response, turning `{errors: [...]}` bodies into `AppError::Provider`.
  async fn read(response: Response) -> AppResult<Value> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    if status.is_success() {
      return Ok(body);
    }
    let message = body["errors"][0]["detail"]
      .as_str()
      .map(str::to_string)
      .unwrap_or_else(|| format!("Square request failed with status {}", status));
    warn!(%status, %message, "Square API error.");
    Err(AppError::Provider {
      message,
      details: body.get("errors").cloned(),
    })
  }

  fn string_field(value: &Value, field: &str) -> AppResult<String> {
    value[field]
      .as_str()
      .map(str::to_string)
      .ok_or_else(|| AppError::Provider {
        message: format!("Square response missing '{}'", field),
        details: None,
      })
  }
}

#[async_trait]
impl PaymentGateway for SquareClient {
  #[instrument(name = "square::create_order", skip_all, fields(idempotency_key = %request.idempotency_key), err(Display))]
  async fn create_order(&self, request: &RemoteOrderRequest) -> AppResult<RemoteOrder> {
    let mut line_items = Vec::with_capacity(request.line_items.len());
    for line in &request.line_items {
      let mut entry = json!({
        "quantity": line.quantity.to_string(),
        "base_price_money": { "amount": to_cents(line.base_price)?, "currency": CURRENCY },
      });
      match &line.catalog_object_id {
        Some(id) => entry["catalog_object_id"] = json!(id),
        None => entry["name"] = json!(line.name),
      }
      line_items.push(entry);
    }
    let body = json!({
      "idempotency_key": request.idempotency_key,
      "order": {
        "location_id": self.location_id,
        "line_items": line_items,
        "state": "OPEN",
      },
    });

    let response = self.request(reqwest::Method::POST, "/v2/orders").json(&body).send().await?;
    let mut body = Self::read(response).await?;
    let order = body["order"].take();
    let id = Self::string_field(&order, "id")?;
    info!(remote_order_id = %id, "Square order created.");
    Ok(RemoteOrder { id, raw: order })
  }

  #[instrument(name = "square::create_payment", skip_all, fields(remote_order_id = %request.remote_order_id), err(Display))]
  async fn create_payment(&self, request: &PaymentRequest) -> AppResult<RemotePayment> {
    let body = json!({
      "source_id": request.source_id,
      "idempotency_key": request.idempotency_key(),
      "amount_money": { "amount": to_cents(request.amount)?, "currency": CURRENCY },
      "order_id": request.remote_order_id,
    });

    let response = self.request(reqwest::Method::POST, "/v2/payments").json(&body).send().await?;
    let mut body = Self::read(response).await?;
    let payment = body["payment"].take();
    let id = Self::string_field(&payment, "id")?;
    let status = payment["status"].as_str().unwrap_or("UNKNOWN").to_string();
    info!(payment_id = %id, %status, "Square payment created.");
    Ok(RemotePayment { id, status, raw: payment })
  }

  #[instrument(name = "square::update_variation_price", skip(self), err(Display))]
  async fn update_variation_price(&self, variation_id: &str, price: Decimal) -> AppResult<Value> {
    let path = format!("/v2/catalog/object/{}", variation_id);
    let response = self.request(reqwest::Method::GET, &path).send().await?;
    let mut retrieved = Self::read(response).await?;
    let mut object = retrieved["object"].take();
    if object.is_null() {
      return Err(AppError::NotFound("Item variation not found".to_string()));
    }

    object["item_variation_data"]["price_money"] = json!({ "amount": to_cents(price)?, "currency": CURRENCY });
    let body = json!({
      "idempotency_key": format!("{}_{}", variation_id, Utc::now().timestamp_millis()),
      "object": object,
    });
    let response = self
      .request(reqwest::Method::POST, "/v2/catalog/object")
      .json(&body)
      .send()
      .await?;
    Self::read(response).await
  }
}
