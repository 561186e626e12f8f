// tests/admin_tests.rs
#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use common::{dec, json_dec, TestContext, ADMIN_PASSWORD};
use foodtruck::models::{MenuCategory, OrderStatus};
use foodtruck::services::Store;
use serde_json::{json, Value};

fn bearer(token: &str) -> (&'static str, String) {
  ("authorization", format!("Bearer {}", token))
}

fn login_request() -> test::TestRequest {
  test::TestRequest::post()
    .uri("/api/v1/admin/login")
    .set_json(json!({ "password": ADMIN_PASSWORD }))
}

fn session_token(body: Value) -> String {
  body["token"].as_str().expect("session token").to_string()
}

#[actix_web::test]
async fn login_checks_the_password() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri("/api/v1/admin/login")
    .set_json(json!({ "password": "not-it" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = test::call_service(&app, login_request().to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert!(!body["token"].as_str().unwrap().is_empty());
  assert!(body["expiresAt"].is_string());
}

#[actix_web::test]
async fn order_listing_requires_a_session_and_filters_by_status() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let first = ctx.insert_pending_order(Duration::minutes(1), Some("remote-a")).await;
  let second = ctx.insert_pending_order(Duration::minutes(2), Some("remote-b")).await;

  let req = test::TestRequest::get().uri("/api/v1/admin/orders").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders")
    .insert_header(bearer("forged-token"))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);

  let req = test::TestRequest::patch()
    .uri(&format!("/api/v1/admin/orders/{}/status", first.id))
    .insert_header(bearer(&token))
    .set_json(json!({ "status": "preparing" }))
    .to_request();
  let updated: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(updated["status"], json!("preparing"));
  assert_eq!(
    ctx.store.get_order(first.id).await.unwrap().unwrap().status,
    OrderStatus::Preparing
  );

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders?status=preparing")
    .insert_header(bearer(&token))
    .to_request();
  let preparing: Vec<Value> = test::call_and_read_body_json(&app, req).await;
  assert_eq!(preparing.len(), 1);
  assert_eq!(preparing[0]["id"], json!(first.id));

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders")
    .insert_header(bearer(&token))
    .to_request();
  let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
  assert_eq!(all.len(), 2);
  assert!(all.iter().any(|o| o["id"] == json!(second.id)));

  // Each order carries its stop and its lines with the items they name.
  let listed = all.iter().find(|o| o["id"] == json!(first.id)).expect("listed order");
  assert_eq!(listed["location"]["name"], json!(ctx.location("Rock Hill").name));
  let lines = listed["items"].as_array().expect("order lines");
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0]["quantity"], json!(1));
  assert_eq!(lines[0]["menu_item"]["name"], json!("Jerk Chicken"));
  assert_eq!(json_dec(&lines[0]["price"]), ctx.menu_item("Jerk Chicken").price);
}

#[actix_web::test]
async fn status_change_on_unknown_order_is_not_found() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);

  let req = test::TestRequest::patch()
    .uri(&format!("/api/v1/admin/orders/{}/status", uuid::Uuid::new_v4()))
    .insert_header(bearer(&token))
    .set_json(json!({ "status": "completed" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn menu_item_creation_validates_price() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);

  let req = test::TestRequest::post()
    .uri("/api/v1/admin/menu")
    .insert_header(bearer(&token))
    .set_json(json!({ "name": "Festival", "price": 0, "category": "sides" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::post()
    .uri("/api/v1/admin/menu")
    .insert_header(bearer(&token))
    .set_json(json!({ "name": "Festival", "price": 3.25, "category": "sides", "is_vegetarian": true }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;
  assert_eq!(json_dec(&created["price"]), dec("3.25"));

  let menu = ctx.store.list_menu().await.unwrap();
  assert_eq!(menu.len(), ctx.menu.len() + 1);
  assert!(menu.iter().any(|m| m.name == "Festival" && m.is_vegetarian));
}

#[actix_web::test]
async fn price_change_is_pushed_to_the_provider() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);
  let jerk = ctx.menu_item("Jerk Chicken").clone();

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/menu/{}", jerk.id))
    .insert_header(bearer(&token))
    .set_json(json!({
      "name": jerk.name,
      "description": jerk.description,
      "price": 13.5,
      "category": "signatures",
      "square_item_id": jerk.square_item_id,
      "square_variation_id": jerk.square_variation_id,
    }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["squareSync"]["status"], json!("synced"));
  assert_eq!(json_dec(&body["item"]["price"]), dec("13.5"));
  assert_eq!(ctx.gateway.catalog_price_cents("JERK_CHICKEN_REG"), Some(1350));

  // Same price again: nothing to push.
  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/menu/{}", jerk.id))
    .insert_header(bearer(&token))
    .set_json(json!({
      "name": "Jerk Chicken Plate",
      "price": 13.5,
      "category": "signatures",
      "square_variation_id": jerk.square_variation_id,
    }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["squareSync"]["status"], json!("skipped"));
  assert_eq!(
    ctx.store.get_menu_item(jerk.id).await.unwrap().unwrap().name,
    "Jerk Chicken Plate"
  );
}

#[actix_web::test]
async fn logout_invalidates_the_token() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);

  let req = test::TestRequest::post()
    .uri("/api/v1/admin/logout")
    .insert_header(bearer(&token))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders")
    .insert_header(bearer(&token))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn price_function_is_admin_only() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri("/functions/update-square-price")
    .set_json(json!({ "squareVariationId": "OXTAIL_REG", "price": 17 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(ctx.gateway.catalog_price_cents("OXTAIL_REG"), None);

  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);
  let req = test::TestRequest::post()
    .uri("/functions/update-square-price")
    .insert_header(bearer(&token))
    .set_json(json!({ "squareVariationId": "OXTAIL_REG", "price": 17 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["catalog_object"]["id"], json!("OXTAIL_REG"));
  assert_eq!(ctx.gateway.catalog_price_cents("OXTAIL_REG"), Some(1700));

  let req = test::TestRequest::post()
    .uri("/functions/update-square-price")
    .insert_header(bearer(&token))
    .set_json(json!({ "price": 17 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], json!("Missing required fields"));
}

#[actix_web::test]
async fn menu_items_on_past_orders_cannot_be_deleted() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);
  ctx.insert_pending_order(Duration::minutes(1), Some("remote-a")).await;
  let sold = ctx.menu_item("Jerk Chicken");
  let unsold = ctx.menu_item("Rum Cake");

  let req = test::TestRequest::delete()
    .uri(&format!("/api/v1/admin/menu/{}", unsold.id))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::delete()
    .uri(&format!("/api/v1/admin/menu/{}", sold.id))
    .insert_header(bearer(&token))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
  assert!(ctx.store.get_menu_item(sold.id).await.unwrap().is_some());

  let req = test::TestRequest::delete()
    .uri(&format!("/api/v1/admin/menu/{}", unsold.id))
    .insert_header(bearer(&token))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
  assert!(ctx.store.get_menu_item(unsold.id).await.unwrap().is_none());

  let req = test::TestRequest::delete()
    .uri(&format!("/api/v1/admin/menu/{}", unsold.id))
    .insert_header(bearer(&token))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn reorder_sets_display_positions() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let token = session_token(test::call_and_read_body_json(&app, login_request().to_request()).await);
  let oxtail = ctx.menu_item("Oxtail Stew").id;
  let jerk = ctx.menu_item("Jerk Chicken").id;

  let req = test::TestRequest::put()
    .uri("/api/v1/admin/menu/order")
    .insert_header(bearer(&token))
    .set_json(json!({ "ids": [oxtail, jerk] }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["updated"], json!(2));

  let menu = ctx.store.list_menu().await.unwrap();
  let signatures: Vec<&str> = menu
    .iter()
    .filter(|m| m.category == MenuCategory::Signatures)
    .map(|m| m.name.as_str())
    .collect();
  assert_eq!(signatures, vec!["Oxtail Stew", "Jerk Chicken"]);
  assert_eq!(ctx.store.get_menu_item(oxtail).await.unwrap().unwrap().display_order, 1);

  for ids in [json!([]), json!([jerk, jerk]), json!([jerk, uuid::Uuid::new_v4()])] {
    let req = test::TestRequest::put()
      .uri("/api/v1/admin/menu/order")
      .insert_header(bearer(&token))
      .set_json(json!({ "ids": ids }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
  }
  assert_eq!(ctx.store.get_menu_item(jerk).await.unwrap().unwrap().display_order, 2);
}
