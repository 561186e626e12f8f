// foodtruck/src/web/routes.rs

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Next};
use actix_web::{http::Method, web, HttpResponse};

use crate::web::handlers::{
  admin_handlers, catalog_handlers, content_handlers, function_handlers, order_handlers, webhook_handlers,
};

pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type, x-square-signature";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Headers attached to every response, preflights included.
pub fn cors_headers() -> DefaultHeaders {
  DefaultHeaders::new()
    .add(("Access-Control-Allow-Origin", "*"))
    .add(("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS))
    .add(("Access-Control-Allow-Methods", CORS_ALLOW_METHODS))
}

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Short-circuits `OPTIONS` preflights on every path with an empty 200.
pub async fn answer_preflight(
  req: ServiceRequest,
  next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
  if req.method() == Method::OPTIONS {
    return Ok(req.into_response(HttpResponse::Ok().finish()).map_into_right_body());
  }
  let res = next.call(req).await?;
  Ok(res.map_into_left_body())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_check_handler))
        .route("/menu", web::get().to(catalog_handlers::list_menu_handler))
        .route("/locations", web::get().to(catalog_handlers::list_locations_handler))
        .route(
          "/locations/{location_id}/slots",
          web::get().to(catalog_handlers::pickup_slots_handler),
        )
        .route("/schedules", web::get().to(catalog_handlers::list_schedules_handler))
        .route("/schedules/open", web::get().to(catalog_handlers::open_status_handler))
        .route("/reviews", web::get().to(content_handlers::list_reviews_handler))
        .route("/reviews", web::post().to(content_handlers::submit_review_handler))
        .route("/gallery", web::get().to(content_handlers::list_gallery_handler))
        .route("/blog", web::get().to(content_handlers::list_posts_handler))
        .route("/blog/{post_id}", web::get().to(content_handlers::get_post_handler))
        .route("/orders", web::post().to(order_handlers::submit_order_handler))
        .route(
          "/orders/{order_id}/payment",
          web::post().to(order_handlers::capture_payment_handler),
        )
        .service(
          web::scope("/admin")
            .route("/login", web::post().to(admin_handlers::login_handler))
            .route("/logout", web::post().to(admin_handlers::logout_handler))
            .route("/orders", web::get().to(admin_handlers::list_orders_handler))
            .route(
              "/orders/{order_id}/status",
              web::patch().to(admin_handlers::update_order_status_handler),
            )
            .route("/menu", web::post().to(admin_handlers::create_menu_item_handler))
            .route("/menu/order", web::put().to(admin_handlers::reorder_menu_handler))
            .route("/menu/{menu_item_id}", web::put().to(admin_handlers::update_menu_item_handler))
            .route("/menu/{menu_item_id}", web::delete().to(admin_handlers::delete_menu_item_handler))
            .route("/gallery", web::post().to(content_handlers::create_gallery_item_handler))
            .route(
              "/gallery/{gallery_item_id}",
              web::put().to(content_handlers::update_gallery_item_handler),
            )
            .route(
              "/gallery/{gallery_item_id}",
              web::delete().to(content_handlers::delete_gallery_item_handler),
            ),
        ),
    )
    .service(
      web::scope("/functions")
        .route("/create-order", web::post().to(function_handlers::create_order_function))
        .route("/process-payment", web::post().to(function_handlers::process_payment_function))
        .route(
          "/update-square-price",
          web::post().to(function_handlers::update_square_price_function),
        )
        .route("/square-webhook", web::post().to(webhook_handlers::square_webhook_handler)),
    );
}
