// tests/webhook_tests.rs
#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Utc;
use common::{TestContext, WEBHOOK_KEY};
use foodtruck::services::webhook_auth::{sign, SIGNATURE_HEADER};
use foodtruck::services::Store;
use serde_json::{json, Value};

const WEBHOOK_URI: &str = "/functions/square-webhook";

fn inventory_body(event_id: &str, variation_id: &str, quantity: &str) -> Vec<u8> {
  serde_json::to_vec(&json!({
    "event_id": event_id,
    "type": "inventory.count.updated",
    "data": { "object": { "catalogObjectId": variation_id, "counts": [{ "quantity": quantity }] } }
  }))
  .unwrap()
}

fn signed(body: &[u8]) -> test::TestRequest {
  test::TestRequest::post()
    .uri(WEBHOOK_URI)
    .insert_header((SIGNATURE_HEADER, sign(WEBHOOK_KEY, body).unwrap()))
    .insert_header(("content-type", "application/json"))
    .set_payload(body.to_vec())
}

async fn stock_of(ctx: &TestContext, name: &str) -> Option<i64> {
  let id = ctx.menu_item(name).id;
  ctx.store.get_menu_item(id).await.unwrap().unwrap().square_stock
}

#[actix_web::test]
async fn bad_or_missing_signature_is_rejected_without_side_effects() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let body = inventory_body("evt-1", "JERK_CHICKEN_REG", "17");

  let forged = test::TestRequest::post()
    .uri(WEBHOOK_URI)
    .insert_header((SIGNATURE_HEADER, sign("some-other-key", &body).unwrap()))
    .set_payload(body.clone())
    .to_request();
  let resp = test::call_service(&app, forged).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let reply: Value = test::read_body_json(resp).await;
  assert!(reply["error"].is_string());

  let unsigned = test::TestRequest::post().uri(WEBHOOK_URI).set_payload(body).to_request();
  assert_eq!(test::call_service(&app, unsigned).await.status(), StatusCode::UNAUTHORIZED);

  assert!(ctx.store.webhook_events().is_empty());
  assert_eq!(stock_of(&ctx, "Jerk Chicken").await, None);
}

#[actix_web::test]
async fn inventory_update_sets_stock_and_marks_event_processed() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let before = Utc::now();

  let resp = test::call_service(&app, signed(&inventory_body("evt-2", "JERK_CHICKEN_REG", "17")).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let reply: Value = test::read_body_json(resp).await;
  assert_eq!(reply, json!({ "success": true }));

  let item = ctx
    .store
    .get_menu_item(ctx.menu_item("Jerk Chicken").id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(item.square_stock, Some(17));
  assert!(item.last_synced_at.is_some_and(|t| t >= before));
  assert_eq!(stock_of(&ctx, "Oxtail Stew").await, None);

  let events = ctx.store.webhook_events();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].dedupe_key, "evt-2");
  assert_eq!(events[0].event_type, "inventory.count.updated");
  assert!(events[0].processed);
}

#[actix_web::test]
async fn inventory_update_without_counts_changes_nothing() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let body = serde_json::to_vec(&json!({
    "event_id": "evt-3",
    "type": "inventory.count.updated",
    "data": { "object": { "catalogObjectId": "JERK_CHICKEN_REG", "counts": [] } }
  }))
  .unwrap();

  assert_eq!(test::call_service(&app, signed(&body).to_request()).await.status(), StatusCode::OK);
  assert_eq!(stock_of(&ctx, "Jerk Chicken").await, None);
}

#[actix_web::test]
async fn replayed_event_is_acknowledged_without_reapplying() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let body = inventory_body("evt-4", "PLANTAIN_REG", "9");

  assert_eq!(test::call_service(&app, signed(&body).to_request()).await.status(), StatusCode::OK);
  assert_eq!(stock_of(&ctx, "Fried Plantains").await, Some(9));

  ctx
    .store
    .update_stock_by_variation("PLANTAIN_REG", 4, Utc::now())
    .await
    .unwrap();

  let resp = test::call_service(&app, signed(&body).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let reply: Value = test::read_body_json(resp).await;
  assert_eq!(reply, json!({ "success": true, "duplicate": true }));
  assert_eq!(stock_of(&ctx, "Fried Plantains").await, Some(4));
  assert_eq!(ctx.store.webhook_events().len(), 1);
}

#[actix_web::test]
async fn events_without_id_dedupe_on_body_digest() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let body = serde_json::to_vec(&json!({ "type": "payment.updated", "data": { "object": {} } })).unwrap();

  let first: Value = test::call_and_read_body_json(&app, signed(&body).to_request()).await;
  assert_eq!(first, json!({ "success": true }));
  let second: Value = test::call_and_read_body_json(&app, signed(&body).to_request()).await;
  assert_eq!(second["duplicate"], json!(true));

  let events = ctx.store.webhook_events();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].dedupe_key.len(), 64);
}

#[actix_web::test]
async fn catalog_update_clears_sync_marker_and_logs() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;

  // Give the item a sync timestamp first.
  let inventory = inventory_body("evt-5", "JERK_CHICKEN_REG", "12");
  test::call_service(&app, signed(&inventory).to_request()).await;

  let body = serde_json::to_vec(&json!({
    "event_id": "evt-6",
    "type": "catalog.version.updated",
    "data": { "object": { "catalogObjectId": "JERK_CHICKEN_REG_ITEM" } }
  }))
  .unwrap();
  let reply: Value = test::call_and_read_body_json(&app, signed(&body).to_request()).await;
  assert_eq!(reply, json!({ "success": true }));

  let item = ctx
    .store
    .get_menu_item(ctx.menu_item("Jerk Chicken").id)
    .await
    .unwrap()
    .unwrap();
  assert!(item.last_synced_at.is_none());
  assert_eq!(item.square_stock, Some(12));

  let logs = ctx.store.sync_logs();
  assert_eq!(logs.len(), 1);
  assert_eq!(logs[0].sync_type, "catalog");
  assert_eq!(logs[0].status, "completed");
  assert!(logs[0].completed_at.is_some());
  assert_eq!(logs[0].details["catalog_object_id"], json!("JERK_CHICKEN_REG_ITEM"));
}

#[actix_web::test]
async fn malformed_body_is_a_server_error() {
  let ctx = TestContext::new();
  let app = init_app!(ctx.state).await;
  let body = b"not json".to_vec();

  let resp = test::call_service(&app, signed(&body).to_request()).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let reply: Value = test::read_body_json(resp).await;
  assert!(reply["error"].as_str().unwrap().contains("not JSON"));
}
