// foodtruck/src/web/handlers/mod.rs

pub mod admin_handlers;
pub mod catalog_handlers;
pub mod content_handlers;
pub mod function_handlers;
pub mod order_handlers;
pub mod webhook_handlers;
