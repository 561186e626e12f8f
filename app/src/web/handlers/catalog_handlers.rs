// foodtruck/src/web/handlers/catalog_handlers.rs

//! Public read-only endpoints: menu, locations, schedules and pickup slots.

use actix_web::{web, HttpResponse};
use chrono::NaiveTime;
use std::collections::BTreeSet;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::slots::{format_slot, is_open, parse_date, pickup_slots};
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_menu", skip(app_state))]
pub async fn list_menu_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let menu = app_state.store.list_menu().await?;
  info!(count = menu.len(), "Menu fetched.");
  Ok(HttpResponse::Ok().json(menu))
}

#[instrument(name = "handler::list_locations", skip(app_state))]
pub async fn list_locations_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let locations = app_state.store.list_locations().await?;
  Ok(HttpResponse::Ok().json(locations))
}

/// Upcoming schedules, today (truck-local) included.
#[instrument(name = "handler::list_schedules", skip(app_state))]
pub async fn list_schedules_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let schedules = app_state.store.list_schedules(app_state.local_today()).await?;
  Ok(HttpResponse::Ok().json(schedules))
}

#[instrument(name = "handler::open_status", skip(app_state))]
pub async fn open_status_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let now = app_state.local_now();
  let todays = app_state.store.schedules_on(now.date(), None).await?;
  Ok(HttpResponse::Ok().json(json!({ "open": is_open(&todays, now) })))
}

#[derive(Deserialize, Debug)]
pub struct SlotsQuery {
  pub date: Option<String>,
}

#[instrument(name = "handler::pickup_slots", skip(app_state, path, query), fields(location_id = %path.as_ref()))]
pub async fn pickup_slots_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  query: web::Query<SlotsQuery>,
) -> Result<HttpResponse, AppError> {
  let location_id = path.into_inner();
  let raw_date = query
    .date
    .as_deref()
    .ok_or_else(|| AppError::Validation("Query parameter 'date' is required".to_string()))?;
  let date = parse_date(raw_date).ok_or_else(|| AppError::Validation(format!("Invalid date '{}'", raw_date)))?;

  if app_state.store.get_location(location_id).await?.is_none() {
    return Err(AppError::NotFound(format!("Location {}", location_id)));
  }

  // Overlapping windows on one day yield each time once, in order.
  let times: BTreeSet<NaiveTime> = app_state
    .store
    .schedules_on(date, Some(location_id))
    .await?
    .iter()
    .flat_map(|s| pickup_slots(s.start_time, s.end_time))
    .collect();
  let slots: Vec<String> = times.into_iter().map(format_slot).collect();

  Ok(HttpResponse::Ok().json(json!({
    "locationId": location_id,
    "date": date,
    "slots": slots,
  })))
}
