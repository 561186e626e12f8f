// tests/order_flow_tests.rs
#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use common::{dec, json_dec, TestContext};
use foodtruck::models::{OrderFilter, OrderStatus};
use foodtruck::services::payment_mock::DECLINED_NONCE;
use foodtruck::services::Store;
use serde_json::{json, Value};
use uuid::Uuid;

fn submission(ctx: &TestContext, city: &str, lines: &[(&str, u32)]) -> Value {
  let items: Vec<Value> = lines
    .iter()
    .map(|(name, quantity)| json!({ "menuItemId": ctx.menu_item(name).id, "quantity": quantity }))
    .collect();
  json!({
    "customerName": "Jane Doe",
    "customerEmail": "jane@example.com",
    "customerPhone": "803-555-0142",
    "locationId": ctx.location(city).id,
    "date": ctx.service_date(city).format("%Y-%m-%d").to_string(),
    "time": "11:30 AM",
    "items": items,
  })
}

#[actix_web::test]
async fn rock_hill_order_totals_and_persists_atomically() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .set_json(submission(&ctx, "Rock Hill", &[("Jerk Chicken", 2)]))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;

  assert_eq!(json_dec(&body["subtotal"]), dec("24.00"));
  assert_eq!(json_dec(&body["tax"]), dec("1.92"));
  assert_eq!(json_dec(&body["total"]), dec("25.92"));
  assert!(body["remoteOrderId"].as_str().unwrap().starts_with("mock_order_"));

  let order_id: Uuid = body["orderId"].as_str().unwrap().parse().unwrap();
  let order = ctx.store.get_order(order_id).await.unwrap().unwrap();
  assert_eq!(order.status, OrderStatus::Pending);
  assert_eq!(order.total_amount, dec("25.92"));
  assert_eq!(order.square_order_id.as_deref(), body["remoteOrderId"].as_str());
  assert!(order.square_payment_id.is_none());

  let items = ctx.store.order_items(order_id).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].quantity, 2);
  assert_eq!(items[0].price, dec("12.00"));
}

#[actix_web::test]
async fn stored_total_equals_items_plus_tax() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .set_json(submission(
      &ctx,
      "Charlotte",
      &[("Oxtail Stew", 1), ("Fried Plantains", 3), ("Extra Sauce", 1)],
    ))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  let order_id: Uuid = body["orderId"].as_str().unwrap().parse().unwrap();

  let order = ctx.store.get_order(order_id).await.unwrap().unwrap();
  let items = ctx.store.order_items(order_id).await.unwrap();
  let subtotal: rust_decimal::Decimal = items.iter().map(|i| i.line_total()).sum();
  assert_eq!(subtotal, dec("30.75"));
  // Charlotte is taxed at the North Carolina rate.
  assert_eq!(order.total_amount, subtotal + subtotal * dec("0.075"));
}

#[actix_web::test]
async fn invalid_submission_never_reaches_the_provider() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;

  let mut empty_cart = submission(&ctx, "Rock Hill", &[]);
  empty_cart["items"] = json!([]);
  let mut bad_time = submission(&ctx, "Rock Hill", &[("Sorrel", 1)]);
  bad_time["time"] = json!("half past noon");
  let mut no_name = submission(&ctx, "Rock Hill", &[("Sorrel", 1)]);
  no_name["customerName"] = json!("   ");
  let mut unknown_location = submission(&ctx, "Rock Hill", &[("Sorrel", 1)]);
  unknown_location["locationId"] = json!(Uuid::new_v4());

  for payload in [empty_cart, bad_time, no_name, unknown_location] {
    let req = test::TestRequest::post().uri("/api/v1/orders").set_json(payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
  }

  assert_eq!(ctx.gateway.orders_created(), 0);
  assert!(ctx.store.all_orders().is_empty());
}

#[actix_web::test]
async fn repeated_lines_exceeding_storable_quantity_are_rejected() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let huge = i32::MAX as u32;

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .set_json(submission(&ctx, "Rock Hill", &[("Jerk Chicken", huge), ("Jerk Chicken", huge)]))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("too large"));

  assert_eq!(ctx.gateway.orders_created(), 0);
  assert!(ctx.store.all_orders().is_empty());
}

#[actix_web::test]
async fn pickup_must_fall_on_a_scheduled_slot() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;

  let mut past = submission(&ctx, "Rock Hill", &[("Sorrel", 1)]);
  past["date"] = json!((Utc::now() - Duration::days(3)).date_naive().format("%Y-%m-%d").to_string());
  let mut after_hours = submission(&ctx, "Rock Hill", &[("Sorrel", 1)]);
  after_hours["time"] = json!("4:00 PM");
  let mut off_day = submission(&ctx, "Rock Hill", &[("Sorrel", 1)]);
  off_day["date"] = json!(ctx.service_date("Charlotte").format("%Y-%m-%d").to_string());

  for payload in [past, after_hours, off_day] {
    let req = test::TestRequest::post().uri("/api/v1/orders").set_json(payload).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
  }

  // The closing time is itself a valid slot.
  let mut closing = submission(&ctx, "Rock Hill", &[("Sorrel", 1)]);
  closing["time"] = json!("2:00 PM");
  let req = test::TestRequest::post().uri("/api/v1/orders").set_json(closing).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
  assert_eq!(ctx.store.all_orders().len(), 1);
}

#[actix_web::test]
async fn provider_failure_cancels_the_persisted_order() {
  let ctx = TestContext::new();
  ctx.gateway.fail_orders(true);
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .set_json(submission(&ctx, "Rock Hill", &[("Jerk Chicken", 1)]))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

  let orders = ctx.store.all_orders();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].status, OrderStatus::Cancelled);
  assert!(orders[0].square_order_id.is_none());
}

async fn submit(ctx: &TestContext) -> Uuid {
  let app = init_app!(ctx.state).await;
  let req = test::TestRequest::post()
    .uri("/api/v1/orders")
    .set_json(submission(ctx, "Rock Hill", &[("Jerk Chicken", 2)]))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  body["orderId"].as_str().unwrap().parse().unwrap()
}

#[actix_web::test]
async fn payment_records_transaction_and_returns_confirmation() {
  let ctx = TestContext::new();
  let order_id = submit(&ctx).await;
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/orders/{}/payment", order_id))
    .set_json(json!({ "nonce": "cnon:card-nonce-ok" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;

  assert_eq!(body["orderId"], json!(order_id));
  assert_eq!(json_dec(&body["total"]), dec("25.92"));
  assert_eq!(body["locationName"], json!("Rock Hill Downtown"));
  assert_eq!(body["customer"]["name"], json!("Jane Doe"));
  assert_eq!(body["items"][0]["name"], json!("Jerk Chicken"));
  assert_eq!(body["items"][0]["quantity"], json!(2));

  let order = ctx.store.get_order(order_id).await.unwrap().unwrap();
  assert_eq!(order.square_payment_id.as_deref(), body["paymentId"].as_str());

  // A second charge for the same order is refused.
  let again = test::TestRequest::post()
    .uri(&format!("/api/v1/orders/{}/payment", order_id))
    .set_json(json!({ "nonce": "cnon:card-nonce-ok" }))
    .to_request();
  assert_eq!(test::call_service(&app, again).await.status(), StatusCode::CONFLICT);
  assert_eq!(ctx.gateway.payments_created(), 1);
}

#[actix_web::test]
async fn declined_card_persists_nothing() {
  let ctx = TestContext::new();
  let order_id = submit(&ctx).await;
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/orders/{}/payment", order_id))
    .set_json(json!({ "nonce": DECLINED_NONCE }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], json!("Card declined"));
  assert!(body["details"].is_array());

  let order = ctx.store.get_order(order_id).await.unwrap().unwrap();
  assert!(order.square_payment_id.is_none());
  assert_eq!(order.status, OrderStatus::Pending);
}

#[actix_web::test]
async fn payment_without_remote_order_is_rejected() {
  let ctx = TestContext::new();
  let order = ctx.insert_pending_order(Duration::minutes(1), None).await;
  let app = init_app!(ctx.state).await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/orders/{}/payment", order.id))
    .set_json(json!({ "nonce": "cnon:card-nonce-ok" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
  assert_eq!(ctx.gateway.payments_created(), 0);

  let missing = test::TestRequest::post()
    .uri(&format!("/api/v1/orders/{}/payment", Uuid::new_v4()))
    .set_json(json!({ "nonce": "cnon:card-nonce-ok" }))
    .to_request();
  assert_eq!(test::call_service(&app, missing).await.status(), StatusCode::NOT_FOUND);

  let no_nonce = test::TestRequest::post()
    .uri(&format!("/api/v1/orders/{}/payment", order.id))
    .set_json(json!({}))
    .to_request();
  assert_eq!(test::call_service(&app, no_nonce).await.status(), StatusCode::BAD_REQUEST);

  let pending = ctx
    .store
    .list_orders(&OrderFilter {
      status: Some(OrderStatus::Pending),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(pending.iter().all(|o| o.square_payment_id.is_none()));
}
