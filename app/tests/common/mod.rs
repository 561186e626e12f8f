// tests/common/mod.rs
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use foodtruck::config::AppConfig;
use foodtruck::models::{Location, MenuItem, Order, OrderItem, OrderStatus, Schedule};
use foodtruck::services::auth_service::hash_password;
use foodtruck::services::seed::sample_data;
use foodtruck::services::{MemoryStore, MockGateway, PaymentGateway, Store};
use foodtruck::state::AppState;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

pub const WEBHOOK_KEY: &str = "test-webhook-signature-key";
pub const ADMIN_PASSWORD: &str = "food-truck-admin";

static ADMIN_HASH: Lazy<String> = Lazy::new(|| hash_password(ADMIN_PASSWORD).expect("hash admin password"));

static TRACING: Lazy<()> = Lazy::new(|| {
  let default_filter_level = Level::INFO;
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(default_filter_level)
    .with_test_writer()
    .finish();
  let _ = tracing::subscriber::set_global_default(subscriber);
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

/// Application state over the seeded in-process store and the mock gateway,
/// with handles kept for inspection.
pub struct TestContext {
  pub state: AppState,
  pub store: Arc<MemoryStore>,
  pub gateway: Arc<MockGateway>,
  pub locations: Vec<Location>,
  pub schedules: Vec<Schedule>,
  pub menu: Vec<MenuItem>,
}

impl TestContext {
  pub fn new() -> Self {
    setup_tracing();
    let seed = sample_data(Utc::now());
    let locations = seed.locations.clone();
    let schedules = seed.schedules.clone();
    let menu = seed.menu.clone();

    let store = Arc::new(MemoryStore::with_seed(seed));
    let gateway = Arc::new(MockGateway::new());
    let config = AppConfig {
      webhook_signature_key: Some(WEBHOOK_KEY.to_string()),
      admin_password_hash: Some(ADMIN_HASH.clone()),
      ..AppConfig::default()
    };
    let state = AppState::new(
      store.clone() as Arc<dyn Store>,
      gateway.clone() as Arc<dyn PaymentGateway>,
      Arc::new(config),
    );
    Self {
      state,
      store,
      gateway,
      locations,
      schedules,
      menu,
    }
  }

  pub fn location(&self, city: &str) -> &Location {
    self
      .locations
      .iter()
      .find(|l| l.address.contains(city))
      .expect("seeded location")
  }

  /// Latest seeded service day at the location in `city`.
  pub fn service_date(&self, city: &str) -> NaiveDate {
    let location_id = self.location(city).id;
    self
      .schedules
      .iter()
      .filter(|s| s.location_id == location_id)
      .map(|s| s.date)
      .max()
      .expect("seeded schedule")
  }

  pub fn menu_item(&self, name: &str) -> &MenuItem {
    self.menu.iter().find(|m| m.name == name).expect("seeded menu item")
  }

  /// Stores a pending order directly, bypassing the submission pipeline.
  pub async fn insert_pending_order(&self, age: Duration, remote_order_id: Option<&str>) -> Order {
    let created_at = Utc::now() - age;
    let item = self.menu_item("Jerk Chicken");
    let order = Order {
      id: Uuid::new_v4(),
      customer_name: "Test Customer".to_string(),
      customer_email: "test@example.com".to_string(),
      customer_phone: "555-0100".to_string(),
      location_id: self.location("Rock Hill").id,
      pickup_time: created_at.naive_utc(),
      total_amount: dec("12.96"),
      status: OrderStatus::Pending,
      square_order_id: remote_order_id.map(str::to_string),
      square_payment_id: None,
      created_at,
      updated_at: created_at,
    };
    let items = vec![OrderItem {
      id: Uuid::new_v4(),
      order_id: order.id,
      menu_item_id: item.id,
      quantity: 1,
      price: item.price,
    }];
    self
      .store
      .insert_order_with_items(&order, &items)
      .await
      .expect("insert order");
    order
  }
}

pub fn dec(s: &str) -> Decimal {
  Decimal::from_str(s).expect("decimal literal")
}

/// Reads a JSON number back as an exact decimal.
pub fn json_dec(value: &serde_json::Value) -> Decimal {
  Decimal::from_str(&value.to_string()).expect("numeric JSON value")
}

/// Builds the service under test with the same wiring as the server binary.
#[macro_export]
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(foodtruck::web::configure_app_routes)
        .wrap(actix_web::middleware::from_fn(foodtruck::web::answer_preflight))
        .wrap(foodtruck::web::cors_headers()),
    )
  };
}
