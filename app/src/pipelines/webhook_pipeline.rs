// foodtruck/src/pipelines/webhook_pipeline.rs

//! Square webhook receiver: authenticate, log, apply, acknowledge.
//!
//! Every accepted delivery is written to the webhook log before it is applied.
//! A delivery whose log entry is already processed is a replay and stops the
//! run without touching the catalog.

use std::str::FromStr;

use crate::errors::AppError;
use crate::models::{SyncLog, WebhookEvent};
use crate::pipelines::contexts::SquareWebhookCtxData;
use crate::services::webhook_auth::{body_digest, verify_signature};
use chrono::Utc;
use orderflow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{event, info, warn, Level};
use uuid::Uuid;

/// Provider notifications this service reacts to, selected by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum SquareEvent {
  #[serde(rename = "inventory.count.updated")]
  InventoryCountUpdated {
    #[serde(default)]
    data: EventData,
  },
  #[serde(rename = "catalog.version.updated")]
  CatalogVersionUpdated {
    #[serde(default)]
    data: EventData,
  },
  #[serde(other)]
  Other,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventData {
  #[serde(default)]
  pub object: EventObject,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventObject {
  #[serde(default, rename = "catalogObjectId", alias = "catalog_object_id")]
  pub catalog_object_id: Option<String>,
  #[serde(default, alias = "inventory_counts")]
  pub counts: Vec<InventoryCount>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryCount {
  #[serde(default, rename = "catalogObjectId", alias = "catalog_object_id")]
  pub catalog_object_id: Option<String>,
  /// Square sends quantities as decimal strings; plain numbers are accepted too.
  #[serde(default)]
  pub quantity: JsonValue,
}

impl InventoryCount {
  pub fn whole_quantity(&self) -> Option<i64> {
    match &self.quantity {
      JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
      JsonValue::String(s) => Decimal::from_str(s.trim()).ok().and_then(|d| d.trunc().to_i64()),
      _ => None,
    }
  }
}

impl SquareEvent {
  /// Payloads without a `type` are acknowledged like any unhandled event.
  pub fn from_payload(payload: &JsonValue) -> Result<Self, AppError> {
    if payload.get("type").and_then(JsonValue::as_str).is_none() {
      return Ok(SquareEvent::Other);
    }
    serde_json::from_value(payload.clone())
      .map_err(|e| AppError::Validation(format!("Malformed webhook payload: {}", e)))
  }
}

pub fn register_webhook_pipeline(registry: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<SquareWebhookCtxData, AppError>::new(&[
    ("verify_signature", false, None),
    ("record_event", false, None),
    ("dispatch_event", false, None),
    ("mark_processed", false, None),
  ]);

  p.on_step("verify_signature", |ctx_data: ContextData<SquareWebhookCtxData>| {
    Box::pin(async move {
      ctx_data.with(|d| {
        verify_signature(
          d.app_state.config.webhook_signature_key.as_deref(),
          d.signature_header.as_deref(),
          &d.raw_payload,
        )
      })?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("record_event", |ctx_data: ContextData<SquareWebhookCtxData>| {
    Box::pin(async move {
      let (raw, store) = ctx_data.with(|d| (d.raw_payload.clone(), d.app_state.store.clone()));
      let payload: JsonValue = serde_json::from_slice(&raw)
        .map_err(|e| AppError::Validation(format!("Webhook body is not JSON: {}", e)))?;

      let event_type = payload
        .get("type")
        .and_then(JsonValue::as_str)
        .unwrap_or("unknown")
        .to_string();
      let dedupe_key = payload
        .get("event_id")
        .and_then(JsonValue::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| body_digest(&raw));

      let logged = store
        .record_webhook_event(&WebhookEvent {
          id: Uuid::new_v4(),
          dedupe_key: dedupe_key.clone(),
          event_type: event_type.clone(),
          payload: payload.clone(),
          processed: false,
          received_at: Utc::now(),
          processed_at: None,
        })
        .await?;

      let duplicate = logged.processed;
      ctx_data.update(|d| {
        d.event_id = Some(logged.id);
        d.event_type = Some(event_type.clone());
        d.payload = Some(payload);
        d.duplicate = duplicate;
      });

      if duplicate {
        info!(%dedupe_key, %event_type, "Webhook replay acknowledged without side effects.");
        return Ok(PipelineControl::Stop);
      }
      event!(Level::DEBUG, %dedupe_key, %event_type, "Webhook logged.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("dispatch_event", |ctx_data: ContextData<SquareWebhookCtxData>| {
    Box::pin(async move {
      let (payload, store) = ctx_data.with(|d| (d.payload.clone().unwrap_or(JsonValue::Null), d.app_state.store.clone()));

      match SquareEvent::from_payload(&payload)? {
        SquareEvent::InventoryCountUpdated { data } => {
          let Some(count) = data.object.counts.first() else {
            info!("Inventory update without counts; nothing to apply.");
            return Ok(PipelineControl::Continue);
          };
          let variation_id = data
            .object
            .catalog_object_id
            .clone()
            .or_else(|| count.catalog_object_id.clone());
          let Some(variation_id) = variation_id else {
            warn!("Inventory update without a catalog object id; nothing to apply.");
            return Ok(PipelineControl::Continue);
          };
          let quantity = count
            .whole_quantity()
            .ok_or_else(|| AppError::Validation(format!("Invalid inventory quantity {}", count.quantity)))?;

          let updated = store.update_stock_by_variation(&variation_id, quantity, Utc::now()).await?;
          info!(%variation_id, quantity, updated, "Stock synchronised from inventory webhook.");
        }
        SquareEvent::CatalogVersionUpdated { data } => {
          let catalog_object_id = data.object.catalog_object_id;
          let log = SyncLog {
            id: Uuid::new_v4(),
            sync_type: "catalog".to_string(),
            status: "in_progress".to_string(),
            details: json!({}),
            started_at: Utc::now(),
            completed_at: None,
          };
          store.insert_sync_log(&log).await?;

          let marked = match catalog_object_id.as_deref() {
            Some(item_id) => store.mark_item_unsynced(item_id).await,
            None => Ok(0),
          };
          match marked {
            Ok(items_marked) => {
              let details = json!({ "catalog_object_id": catalog_object_id, "items_marked": items_marked });
              store.finish_sync_log(log.id, "completed", &details, Utc::now()).await?;
              info!(catalog_object_id = ?catalog_object_id, items_marked, "Catalog change recorded.");
            }
            Err(err) => {
              let details = json!({ "catalog_object_id": catalog_object_id, "error": err.to_string() });
              store.finish_sync_log(log.id, "failed", &details, Utc::now()).await?;
              return Err(err);
            }
          }
        }
        SquareEvent::Other => {
          let event_type = ctx_data.with(|d| d.event_type.clone()).unwrap_or_default();
          info!(%event_type, "Unhandled webhook type acknowledged.");
        }
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("mark_processed", |ctx_data: ContextData<SquareWebhookCtxData>| {
    Box::pin(async move {
      let (event_id, store) = ctx_data.with(|d| (d.event_id, d.app_state.store.clone()));
      if let Some(event_id) = event_id {
        store.mark_webhook_processed(event_id, Utc::now()).await?;
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(p);
}
