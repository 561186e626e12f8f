// foodtruck/src/web/mod.rs

pub mod handlers;
pub mod routes;

pub use routes::{answer_preflight, configure_app_routes, cors_headers};
