// foodtruck/src/models/location.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Location {
  pub id: Uuid,
  pub name: String,
  pub address: String,
  pub image_url: Option<String>,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
}
