// foodtruck/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::auth_service::AdminSessions;
use crate::services::{PaymentGateway, Store};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use orderflow::FlowRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub sessions: Arc<AdminSessions>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers every pipeline against it.
  pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentGateway>, config: Arc<AppConfig>) -> Self {
    let state = Self {
      store,
      gateway,
      flows: Arc::new(FlowRegistry::new()),
      sessions: Arc::new(AdminSessions::new(config.admin_session_ttl)),
      config,
    };
    crate::pipelines::register_all_pipelines(&state.flows);
    state
  }

  /// Current wall-clock time at the truck.
  pub fn local_now(&self) -> NaiveDateTime {
    Utc::now().with_timezone(&self.config.business_utc_offset).naive_local()
  }

  pub fn local_today(&self) -> NaiveDate {
    self.local_now().date()
  }
}
