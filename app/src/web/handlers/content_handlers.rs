// foodtruck/src/web/handlers/content_handlers.rs

//! Site content: customer reviews, the photo gallery and the blog.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::review::{MAX_RATING, MIN_RATING};
use crate::models::{GalleryFilter, GalleryItem, GalleryItemInput, GalleryKind, Review};
use crate::state::AppState;
use crate::web::handlers::admin_handlers::AdminSession;

#[instrument(name = "handler::list_reviews", skip(app_state))]
pub async fn list_reviews_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let reviews = app_state.store.list_reviews().await?;
  Ok(HttpResponse::Ok().json(reviews))
}

#[derive(Deserialize, Debug)]
pub struct ReviewPayload {
  #[serde(default)]
  pub customer_name: String,
  #[serde(default = "default_rating")]
  pub rating: i32,
  #[serde(default)]
  pub comment: String,
  pub image_url: Option<String>,
}

fn default_rating() -> i32 {
  MAX_RATING
}

#[instrument(name = "handler::submit_review", skip_all, fields(rating = req_payload.rating))]
pub async fn submit_review_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ReviewPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let customer_name = payload.customer_name.trim();
  let comment = payload.comment.trim();
  if customer_name.is_empty() || comment.is_empty() {
    return Err(AppError::Validation("Name and comment are required".to_string()));
  }
  if !(MIN_RATING..=MAX_RATING).contains(&payload.rating) {
    return Err(AppError::Validation(format!(
      "Rating must be between {} and {}",
      MIN_RATING, MAX_RATING
    )));
  }

  let review = Review {
    id: Uuid::new_v4(),
    customer_name: customer_name.to_string(),
    rating: payload.rating,
    comment: comment.to_string(),
    image_url: payload.image_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
    created_at: Utc::now(),
  };
  app_state.store.insert_review(&review).await?;
  info!(review_id = %review.id, "Review submitted.");
  Ok(HttpResponse::Created().json(review))
}

#[instrument(name = "handler::list_gallery", skip(app_state))]
pub async fn list_gallery_handler(
  app_state: web::Data<AppState>,
  query: web::Query<GalleryFilter>,
) -> Result<HttpResponse, AppError> {
  let items = app_state.store.list_gallery(&query).await?;
  Ok(HttpResponse::Ok().json(items))
}

fn require_gallery_fields(input: &GalleryItemInput) -> Result<GalleryKind, AppError> {
  let mut missing = Vec::new();
  if input.title.trim().is_empty() {
    missing.push("title");
  }
  if input.image_url.trim().is_empty() {
    missing.push("image_url");
  }
  if input.kind.is_none() {
    missing.push("type");
  }
  if input.location.trim().is_empty() {
    missing.push("location");
  }
  match input.kind {
    Some(kind) if missing.is_empty() => Ok(kind),
    _ => Err(AppError::Validation(format!("Missing required fields: {}", missing.join(", ")))),
  }
}

#[instrument(name = "handler::admin_create_gallery_item", skip_all)]
pub async fn create_gallery_item_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<GalleryItemInput>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let input = req_payload.into_inner();
  let kind = require_gallery_fields(&input)?;
  let now = Utc::now();
  let item = GalleryItem {
    id: Uuid::new_v4(),
    title: input.title.trim().to_string(),
    image_url: input.image_url.trim().to_string(),
    kind,
    location: input.location.trim().to_string(),
    created_at: now,
    updated_at: now,
  };
  app_state.store.insert_gallery_item(&item).await?;
  info!(gallery_item_id = %item.id, "Gallery item created.");
  Ok(HttpResponse::Created().json(item))
}

#[instrument(name = "handler::admin_update_gallery_item", skip(app_state, path, req_payload, _session), fields(gallery_item_id = %path.as_ref()))]
pub async fn update_gallery_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<GalleryItemInput>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  require_gallery_fields(&req_payload)?;
  let item = app_state
    .store
    .update_gallery_item(item_id, &req_payload, Utc::now())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Gallery item {}", item_id)))?;
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::admin_delete_gallery_item", skip(app_state, path, _session), fields(gallery_item_id = %path.as_ref()))]
pub async fn delete_gallery_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  if !app_state.store.delete_gallery_item(item_id).await? {
    return Err(AppError::NotFound(format!("Gallery item {}", item_id)));
  }
  info!("Gallery item deleted.");
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::list_posts", skip(app_state))]
pub async fn list_posts_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let posts = app_state.store.list_published_posts().await?;
  Ok(HttpResponse::Ok().json(posts))
}

/// Drafts answer 404, same as a missing id.
#[instrument(name = "handler::get_post", skip(app_state, path), fields(post_id = %path.as_ref()))]
pub async fn get_post_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let post_id = path.into_inner();
  let post = app_state
    .store
    .get_published_post(post_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Blog post {}", post_id)))?;
  Ok(HttpResponse::Ok().json(post))
}
