// foodtruck/src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::SquareWebhookCtxData;
use crate::services::webhook_auth::SIGNATURE_HEADER;
use crate::state::AppState;
use orderflow::{ContextData, PipelineResult};

/// `POST /functions/square-webhook`. Replies 200 `{success}` on acceptance,
/// 401 `{error}` on a bad signature and 500 `{error}` otherwise.
#[instrument(name = "handler::square_webhook", skip(app_state, req, body), fields(body_len = body.len()))]
pub async fn square_webhook_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> HttpResponse {
  let signature_header = req
    .headers()
    .get(SIGNATURE_HEADER)
    .and_then(|h| h.to_str().ok())
    .map(String::from);

  let ctx_data = ContextData::new(SquareWebhookCtxData::new(
    app_state.get_ref().clone(),
    body,
    signature_header,
  ));

  match app_state.flows.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let event_type = ctx_data.with(|d| d.event_type.clone()).unwrap_or_default();
      info!(%event_type, "Webhook processed.");
      HttpResponse::Ok().json(json!({ "success": true }))
    }
    Ok(PipelineResult::Stopped) => {
      if ctx_data.with(|d| d.duplicate) {
        HttpResponse::Ok().json(json!({ "success": true, "duplicate": true }))
      } else {
        warn!("Webhook pipeline stopped before processing.");
        AppError::PipelineHaltedByHandler.function_response()
      }
    }
    Err(app_err) => app_err.function_response(),
  }
}
