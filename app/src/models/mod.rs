// foodtruck/src/models/mod.rs

//! Data structures representing database entities.

pub mod blog_post;
pub mod gallery_item;
pub mod location;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod review;
pub mod schedule;
pub mod sync_log;
pub mod webhook_event;

pub use blog_post::{BlogPost, BlogStatus};
pub use gallery_item::{GalleryFilter, GalleryItem, GalleryItemInput, GalleryKind};
pub use location::Location;
pub use menu_item::{MenuCategory, MenuItem};
pub use order::{Order, OrderDetails, OrderFilter, OrderLineDetails, OrderStatus};
pub use order_item::OrderItem;
pub use review::Review;
pub use schedule::Schedule;
pub use sync_log::SyncLog;
pub use webhook_event::WebhookEvent;
