// foodtruck/src/web/handlers/admin_handlers.rs

use std::collections::HashSet;

use actix_web::{http::header, web, FromRequest, HttpRequest, HttpResponse};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{MenuCategory, MenuItem, OrderFilter, OrderStatus};
use crate::services::auth_service::verify_password;
use crate::services::MenuItemRemoval;
use crate::state::AppState;

/// A request carrying a live admin bearer token.
#[derive(Debug)]
pub struct AdminSession {
  pub token: String,
}

impl FromRequest for AdminSession {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    futures_util::future::ready(admin_session_from(req))
  }
}

fn admin_session_from(req: &HttpRequest) -> Result<AdminSession, AppError> {
  let app_state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state not configured".to_string()))?;
  let token = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or_else(|| AppError::Auth("Admin authentication required".to_string()))?;

  if !app_state.sessions.validate(token, Utc::now()) {
    warn!("Rejected an unknown or expired admin token.");
    return Err(AppError::Auth("Admin session is invalid or expired".to_string()));
  }
  Ok(AdminSession {
    token: token.to_string(),
  })
}

#[derive(Deserialize)]
pub struct LoginPayload {
  #[serde(default)]
  pub password: String,
}

#[instrument(name = "handler::admin_login", skip_all)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let Some(hash) = app_state.config.admin_password_hash.as_deref() else {
    return Err(AppError::Auth("Admin login is not configured".to_string()));
  };
  if !verify_password(hash, &req_payload.password)? {
    warn!("Admin login failed.");
    return Err(AppError::Auth("Invalid password".to_string()));
  }

  let (token, expires_at) = app_state.sessions.issue(Utc::now());
  info!(%expires_at, "Admin logged in.");
  Ok(HttpResponse::Ok().json(json!({ "token": token, "expiresAt": expires_at })))
}

#[instrument(name = "handler::admin_logout", skip_all)]
pub async fn logout_handler(app_state: web::Data<AppState>, session: AdminSession) -> HttpResponse {
  app_state.sessions.revoke(&session.token);
  HttpResponse::Ok().json(json!({ "success": true }))
}

#[instrument(name = "handler::admin_list_orders", skip(app_state, _session))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<OrderFilter>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.list_order_details(&query).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[derive(Deserialize, Debug)]
pub struct StatusPayload {
  pub status: OrderStatus,
}

#[instrument(name = "handler::admin_update_status", skip(app_state, path, _session), fields(order_id = %path.as_ref()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<StatusPayload>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state
    .store
    .update_order_status(order_id, req_payload.status, Utc::now())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;
  info!(status = ?order.status, "Order status changed.");
  Ok(HttpResponse::Ok().json(order))
}

/// Editable fields of a menu item.
#[derive(Deserialize, Debug, Clone)]
pub struct MenuItemPayload {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price: Decimal,
  pub category: MenuCategory,
  #[serde(default)]
  pub is_vegetarian: bool,
  #[serde(default)]
  pub is_spicy: bool,
  #[serde(default)]
  pub is_gluten_free: bool,
  #[serde(default)]
  pub display_order: i32,
  pub image_url: Option<String>,
  pub square_item_id: Option<String>,
  pub square_variation_id: Option<String>,
}

impl MenuItemPayload {
  fn validate(&self) -> Result<(), AppError> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Menu item name is required".to_string()));
    }
    if self.price <= Decimal::ZERO {
      return Err(AppError::Validation("Menu item price must be greater than zero".to_string()));
    }
    Ok(())
  }

  fn apply_to(self, item: &mut MenuItem) {
    item.name = self.name.trim().to_string();
    item.description = self.description;
    item.price = self.price;
    item.category = self.category;
    item.is_vegetarian = self.is_vegetarian;
    item.is_spicy = self.is_spicy;
    item.is_gluten_free = self.is_gluten_free;
    item.display_order = self.display_order;
    item.image_url = self.image_url;
    item.square_item_id = self.square_item_id;
    item.square_variation_id = self.square_variation_id;
  }
}

#[instrument(name = "handler::admin_create_menu_item", skip_all)]
pub async fn create_menu_item_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<MenuItemPayload>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  payload.validate()?;

  let now = Utc::now();
  let mut item = MenuItem {
    id: Uuid::new_v4(),
    name: String::new(),
    description: String::new(),
    price: Decimal::ZERO,
    category: payload.category,
    is_vegetarian: false,
    is_spicy: false,
    is_gluten_free: false,
    display_order: 0,
    image_url: None,
    square_item_id: None,
    square_variation_id: None,
    square_stock: None,
    last_synced_at: None,
    created_at: now,
    updated_at: now,
  };
  payload.apply_to(&mut item);
  app_state.store.insert_menu_item(&item).await?;
  info!(menu_item_id = %item.id, name = %item.name, "Menu item created.");
  Ok(HttpResponse::Created().json(item))
}

#[instrument(name = "handler::admin_update_menu_item", skip(app_state, path, req_payload, _session), fields(menu_item_id = %path.as_ref()))]
pub async fn update_menu_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<MenuItemPayload>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let payload = req_payload.into_inner();
  payload.validate()?;

  let mut item = app_state
    .store
    .get_menu_item(item_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Menu item {}", item_id)))?;
  let previous_price = item.price;
  payload.apply_to(&mut item);
  item.updated_at = Utc::now();

  if !app_state.store.update_menu_item(&item).await? {
    return Err(AppError::NotFound(format!("Menu item {}", item_id)));
  }

  // The local edit stands even when the provider rejects the new price.
  let sync = match item.square_variation_id.as_deref() {
    Some(variation_id) if item.price != previous_price => {
      match app_state.gateway.update_variation_price(variation_id, item.price).await {
        Ok(_) => json!({ "status": "synced" }),
        Err(e) => {
          warn!(%variation_id, error = %e, "Provider price sync failed.");
          json!({ "status": "failed", "error": e.to_string() })
        }
      }
    }
    _ => json!({ "status": "skipped" }),
  };

  info!(menu_item_id = %item.id, sync = %sync["status"], "Menu item updated.");
  Ok(HttpResponse::Ok().json(json!({ "item": item, "squareSync": sync })))
}

/// Removes an item from the menu. Items already sold stay, so past orders keep their lines.
#[instrument(name = "handler::admin_delete_menu_item", skip(app_state, path, _session), fields(menu_item_id = %path.as_ref()))]
pub async fn delete_menu_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  match app_state.store.delete_menu_item(item_id).await? {
    MenuItemRemoval::Removed => {
      info!("Menu item deleted.");
      Ok(HttpResponse::NoContent().finish())
    }
    MenuItemRemoval::NotFound => Err(AppError::NotFound(format!("Menu item {}", item_id))),
    MenuItemRemoval::Referenced => Err(AppError::Conflict(format!(
      "Menu item {} appears on past orders and cannot be deleted",
      item_id
    ))),
  }
}

#[derive(Deserialize, Debug)]
pub struct MenuOrderPayload {
  #[serde(default)]
  pub ids: Vec<Uuid>,
}

/// Rewrites `display_order` so items sort in the given order.
#[instrument(name = "handler::admin_reorder_menu", skip_all, fields(items = req_payload.ids.len()))]
pub async fn reorder_menu_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<MenuOrderPayload>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let ids = req_payload.into_inner().ids;
  if ids.is_empty() {
    return Err(AppError::Validation("At least one menu item id is required".to_string()));
  }
  let unique: HashSet<Uuid> = ids.iter().copied().collect();
  if unique.len() != ids.len() {
    return Err(AppError::Validation("Menu item ids must not repeat".to_string()));
  }
  let known = app_state.store.menu_items_by_ids(&ids).await?;
  if let Some(missing) = ids.iter().find(|id| !known.iter().any(|m| m.id == **id)) {
    return Err(AppError::Validation(format!("Unknown menu item {}", missing)));
  }

  let touched = app_state.store.reorder_menu(&ids, Utc::now()).await?;
  info!(touched, "Menu reordered.");
  Ok(HttpResponse::Ok().json(json!({ "success": true, "updated": touched })))
}
