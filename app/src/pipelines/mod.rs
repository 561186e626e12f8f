// foodtruck/src/pipelines/mod.rs

//! Pipelines behind the multi-step operations, plus the orphan sweep.

use crate::errors::AppError;
use orderflow::FlowRegistry;

pub mod contexts;
pub mod payment_pipeline;
pub mod reconcile;
pub mod submit_order_pipeline;
pub mod webhook_pipeline;

/// Registers every pipeline with `registry`. Called once from `AppState::new`.
pub fn register_all_pipelines(registry: &FlowRegistry<AppError>) {
  tracing::info!("Registering pipelines...");

  submit_order_pipeline::register_submit_order_pipeline(registry);
  payment_pipeline::register_payment_pipeline(registry);
  webhook_pipeline::register_webhook_pipeline(registry);

  tracing::info!("All application pipelines registered.");
}
