// foodtruck/src/main.rs

use actix_web::middleware::from_fn;
use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use foodtruck::config::{AppConfig, PaymentProviderKind};
use foodtruck::errors::{AppError, Result as AppResult};
use foodtruck::pipelines::reconcile::spawn_reconciler;
use foodtruck::services::{seed, MemoryStore, MockGateway, PaymentGateway, PgStore, SquareClient, Store};
use foodtruck::state::AppState;
use foodtruck::web::{answer_preflight, configure_app_routes, cors_headers};

async fn build_store(config: &AppConfig) -> AppResult<Arc<dyn Store>> {
  match config.database_url.as_deref() {
    Some(url) => {
      let pool = PgPool::connect(url).await?;
      tracing::info!("Successfully connected to the database.");
      let store = PgStore::new(pool);
      if config.seed_db {
        store.seed_if_empty().await?;
      }
      Ok(Arc::new(store))
    }
    None => {
      tracing::warn!("DATABASE_URL is not set; using the in-process store.");
      let store = if config.seed_db {
        MemoryStore::with_seed(seed::sample_data(chrono::Utc::now()))
      } else {
        MemoryStore::new()
      };
      Ok(Arc::new(store))
    }
  }
}

fn build_gateway(config: &AppConfig) -> Arc<dyn PaymentGateway> {
  match config.payment_provider {
    PaymentProviderKind::Square => Arc::new(SquareClient::new(&config.square)),
    PaymentProviderKind::Mock => {
      tracing::warn!("Using the mock payment gateway; no real charges are made.");
      Arc::new(MockGateway::new())
    }
  }
}

fn startup_error(e: AppError) -> std::io::Error {
  tracing::error!(error = %e, "Startup failed.");
  std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE);
  // LOG_FORMAT=json for log shippers.
  if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
    subscriber.json().init();
  } else {
    subscriber.init();
  }

  tracing::info!("Starting food truck ordering server...");

  let app_config = Arc::new(AppConfig::from_env().map_err(startup_error)?);
  let store = build_store(&app_config).await.map_err(startup_error)?;
  let gateway = build_gateway(&app_config);

  let app_state = AppState::new(store, gateway, app_config.clone());
  let _reconciler = spawn_reconciler(app_state.clone());

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .configure(configure_app_routes)
      .wrap(from_fn(answer_preflight))
      .wrap(cors_headers())
      .wrap(tracing_actix_web::TracingLogger::default())
  })
  .bind(&server_address)?
  .run()
  .await
}
