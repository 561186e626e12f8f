// foodtruck/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::SubmitOrderRequest;
use crate::errors::AppError;
use crate::pipelines::contexts::{CapturePaymentCtxData, OrderReceipt, SubmitOrderCtxData};
use crate::state::AppState;
use orderflow::{ContextData, PipelineResult};

#[instrument(
  name = "handler::submit_order",
  skip(app_state, req_payload),
  fields(location_id = %req_payload.location_id, lines = req_payload.items.len())
)]
pub async fn submit_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SubmitOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(SubmitOrderCtxData::new(
    app_state.get_ref().clone(),
    req_payload.into_inner(),
  ));

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let receipt = ctx_data.with(|d| -> Result<OrderReceipt, AppError> {
        Ok(OrderReceipt {
          order_id: d
            .order_id
            .ok_or_else(|| AppError::Internal("Submission completed without an order id".to_string()))?,
          remote_order_id: d
            .remote_order_id
            .clone()
            .ok_or_else(|| AppError::Internal("Submission completed without a remote order".to_string()))?,
          subtotal: d.subtotal,
          tax: d.tax,
          total: d.total,
          pickup_time: d
            .pickup_time
            .ok_or_else(|| AppError::Internal("Submission completed without a pickup time".to_string()))?,
        })
      })?;
      info!(order_id = %receipt.order_id, total = %receipt.total, "Order submitted.");
      Ok(HttpResponse::Created().json(receipt))
    }
    PipelineResult::Stopped => {
      warn!("Order submission was halted by a handler.");
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}

#[derive(Deserialize, Debug)]
pub struct CapturePaymentPayload {
  #[serde(default)]
  pub nonce: String,
}

#[instrument(name = "handler::capture_payment", skip(app_state, path, req_payload), fields(order_id = %path.as_ref()))]
pub async fn capture_payment_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<CapturePaymentPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let ctx_data = ContextData::new(CapturePaymentCtxData::new(
    app_state.get_ref().clone(),
    order_id,
    req_payload.into_inner().nonce,
  ));

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let confirmation = ctx_data
        .with(|d| d.confirmation.clone())
        .ok_or_else(|| AppError::Internal("Payment completed without a confirmation".to_string()))?;
      info!(%order_id, payment_id = %confirmation.payment_id, "Payment captured.");
      Ok(HttpResponse::Ok().json(confirmation))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}
