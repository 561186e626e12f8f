// foodtruck/src/services/memory_store.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, Result as AppResult};
use crate::models::{
  BlogPost, BlogStatus, GalleryFilter, GalleryItem, GalleryItemInput, Location, MenuItem, Order, OrderFilter,
  OrderItem, OrderStatus, Review, Schedule, SyncLog, WebhookEvent,
};
use crate::services::seed::SeedData;
use crate::services::store::{MenuItemRemoval, Store};

#[derive(Default)]
struct Tables {
  menu: Vec<MenuItem>,
  locations: Vec<Location>,
  schedules: Vec<Schedule>,
  orders: Vec<Order>,
  order_items: Vec<OrderItem>,
  webhooks: Vec<WebhookEvent>,
  sync_logs: Vec<SyncLog>,
  reviews: Vec<Review>,
  gallery: Vec<GalleryItem>,
  posts: Vec<BlogPost>,
}

/// Process-local `Store`. Every call takes one lock, so multi-row writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_seed(seed: SeedData) -> Self {
    Self {
      tables: RwLock::new(Tables {
        menu: seed.menu,
        locations: seed.locations,
        schedules: seed.schedules,
        reviews: seed.reviews,
        gallery: seed.gallery,
        posts: seed.posts,
        ..Default::default()
      }),
    }
  }

  pub fn insert_location(&self, location: Location) {
    self.tables.write().locations.push(location);
  }

  pub fn insert_schedule(&self, schedule: Schedule) {
    self.tables.write().schedules.push(schedule);
  }

  pub fn webhook_events(&self) -> Vec<WebhookEvent> {
    self.tables.read().webhooks.clone()
  }

  pub fn sync_logs(&self) -> Vec<SyncLog> {
    self.tables.read().sync_logs.clone()
  }

  pub fn insert_post(&self, post: BlogPost) {
    self.tables.write().posts.push(post);
  }

  pub fn all_orders(&self) -> Vec<Order> {
    self.tables.read().orders.clone()
  }

  /// Test hook: rewrites an order in place (e.g. to backdate `created_at`).
  pub fn replace_order(&self, order: Order) {
    let mut tables = self.tables.write();
    if let Some(existing) = tables.orders.iter_mut().find(|o| o.id == order.id) {
      *existing = order;
    }
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn list_menu(&self) -> AppResult<Vec<MenuItem>> {
    let mut menu = self.tables.read().menu.clone();
    menu.sort_by(|a, b| {
      (a.category, a.display_order, &a.name).cmp(&(b.category, b.display_order, &b.name))
    });
    Ok(menu)
  }

  async fn get_menu_item(&self, id: Uuid) -> AppResult<Option<MenuItem>> {
    Ok(self.tables.read().menu.iter().find(|m| m.id == id).cloned())
  }

  async fn menu_items_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MenuItem>> {
    Ok(
      self
        .tables
        .read()
        .menu
        .iter()
        .filter(|m| ids.contains(&m.id))
        .cloned()
        .collect(),
    )
  }

  async fn insert_menu_item(&self, item: &MenuItem) -> AppResult<()> {
    let mut tables = self.tables.write();
    if tables.menu.iter().any(|m| m.id == item.id) {
      return Err(AppError::Conflict(format!("Menu item {} already exists", item.id)));
    }
    tables.menu.push(item.clone());
    Ok(())
  }

  async fn update_menu_item(&self, item: &MenuItem) -> AppResult<bool> {
    let mut tables = self.tables.write();
    match tables.menu.iter_mut().find(|m| m.id == item.id) {
      Some(existing) => {
        let (stock, synced, created) = (existing.square_stock, existing.last_synced_at, existing.created_at);
        *existing = item.clone();
        existing.square_stock = stock;
        existing.last_synced_at = synced;
        existing.created_at = created;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn update_stock_by_variation(&self, variation_id: &str, quantity: i64, at: DateTime<Utc>) -> AppResult<u64> {
    let mut tables = self.tables.write();
    let mut touched = 0;
    for item in tables
      .menu
      .iter_mut()
      .filter(|m| m.square_variation_id.as_deref() == Some(variation_id))
    {
      item.square_stock = Some(quantity);
      item.last_synced_at = Some(at);
      touched += 1;
    }
    Ok(touched)
  }

  async fn mark_item_unsynced(&self, square_item_id: &str) -> AppResult<u64> {
    let mut tables = self.tables.write();
    let mut touched = 0;
    for item in tables
      .menu
      .iter_mut()
      .filter(|m| m.square_item_id.as_deref() == Some(square_item_id))
    {
      item.last_synced_at = None;
      touched += 1;
    }
    Ok(touched)
  }

  async fn delete_menu_item(&self, id: Uuid) -> AppResult<MenuItemRemoval> {
    let mut tables = self.tables.write();
    if !tables.menu.iter().any(|m| m.id == id) {
      return Ok(MenuItemRemoval::NotFound);
    }
    if tables.order_items.iter().any(|i| i.menu_item_id == id) {
      return Ok(MenuItemRemoval::Referenced);
    }
    tables.menu.retain(|m| m.id != id);
    Ok(MenuItemRemoval::Removed)
  }

  async fn reorder_menu(&self, ids: &[Uuid], at: DateTime<Utc>) -> AppResult<u64> {
    let mut tables = self.tables.write();
    let mut touched = 0;
    for (position, id) in (1_i32..).zip(ids) {
      if let Some(item) = tables.menu.iter_mut().find(|m| m.id == *id) {
        item.display_order = position;
        item.updated_at = at;
        touched += 1;
      }
    }
    Ok(touched)
  }

  async fn list_locations(&self) -> AppResult<Vec<Location>> {
    let mut locations = self.tables.read().locations.clone();
    locations.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(locations)
  }

  async fn get_location(&self, id: Uuid) -> AppResult<Option<Location>> {
    Ok(self.tables.read().locations.iter().find(|l| l.id == id).cloned())
  }

  async fn list_schedules(&self, from: NaiveDate) -> AppResult<Vec<Schedule>> {
    let mut schedules: Vec<Schedule> = self
      .tables
      .read()
      .schedules
      .iter()
      .filter(|s| s.date >= from)
      .cloned()
      .collect();
    schedules.sort_by_key(|s| (s.date, s.start_time));
    Ok(schedules)
  }

  async fn schedules_on(&self, date: NaiveDate, location_id: Option<Uuid>) -> AppResult<Vec<Schedule>> {
    let mut schedules: Vec<Schedule> = self
      .tables
      .read()
      .schedules
      .iter()
      .filter(|s| s.date == date && location_id.map_or(true, |l| s.location_id == l))
      .cloned()
      .collect();
    schedules.sort_by_key(|s| s.start_time);
    Ok(schedules)
  }

  async fn insert_order_with_items(&self, order: &Order, items: &[OrderItem]) -> AppResult<()> {
    let mut tables = self.tables.write();
    if tables.orders.iter().any(|o| o.id == order.id) {
      return Err(AppError::Conflict(format!("Order {} already exists", order.id)));
    }
    tables.orders.push(order.clone());
    tables.order_items.extend_from_slice(items);
    Ok(())
  }

  async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>> {
    Ok(self.tables.read().orders.iter().find(|o| o.id == id).cloned())
  }

  async fn order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    Ok(
      self
        .tables
        .read()
        .order_items
        .iter()
        .filter(|i| i.order_id == order_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_orders(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
    let mut orders: Vec<Order> = self
      .tables
      .read()
      .orders
      .iter()
      .filter(|o| filter.matches(o))
      .cloned()
      .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders)
  }

  async fn set_remote_order_id(&self, order_id: Uuid, remote_order_id: &str, at: DateTime<Utc>) -> AppResult<()> {
    let mut tables = self.tables.write();
    if let Some(order) = tables.orders.iter_mut().find(|o| o.id == order_id) {
      order.square_order_id = Some(remote_order_id.to_string());
      order.updated_at = at;
    }
    Ok(())
  }

  async fn set_payment_id(&self, order_id: Uuid, payment_id: &str, at: DateTime<Utc>) -> AppResult<bool> {
    let mut tables = self.tables.write();
    match tables
      .orders
      .iter_mut()
      .find(|o| o.id == order_id && o.square_payment_id.is_none())
    {
      Some(order) => {
        order.square_payment_id = Some(payment_id.to_string());
        order.updated_at = at;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus, at: DateTime<Utc>) -> AppResult<Option<Order>> {
    let mut tables = self.tables.write();
    Ok(tables.orders.iter_mut().find(|o| o.id == order_id).map(|order| {
      order.status = status;
      order.updated_at = at;
      order.clone()
    }))
  }

  async fn cancel_orphaned_orders(&self, created_before: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
    let mut tables = self.tables.write();
    let mut cancelled = Vec::new();
    for order in tables.orders.iter_mut().filter(|o| {
      o.status == OrderStatus::Pending && o.square_order_id.is_none() && o.created_at < created_before
    }) {
      order.status = OrderStatus::Cancelled;
      order.updated_at = at;
      cancelled.push(order.id);
    }
    Ok(cancelled)
  }

  async fn record_webhook_event(&self, event: &WebhookEvent) -> AppResult<WebhookEvent> {
    let mut tables = self.tables.write();
    if let Some(existing) = tables.webhooks.iter().find(|w| w.dedupe_key == event.dedupe_key) {
      return Ok(existing.clone());
    }
    tables.webhooks.push(event.clone());
    Ok(event.clone())
  }

  async fn mark_webhook_processed(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
    let mut tables = self.tables.write();
    if let Some(event) = tables.webhooks.iter_mut().find(|w| w.id == id) {
      event.processed = true;
      event.processed_at = Some(at);
    }
    Ok(())
  }

  async fn insert_sync_log(&self, log: &SyncLog) -> AppResult<()> {
    self.tables.write().sync_logs.push(log.clone());
    Ok(())
  }

  async fn finish_sync_log(&self, id: Uuid, status: &str, details: &serde_json::Value, at: DateTime<Utc>) -> AppResult<()> {
    let mut tables = self.tables.write();
    if let Some(log) = tables.sync_logs.iter_mut().find(|l| l.id == id) {
      log.status = status.to_string();
      log.details = details.clone();
      log.completed_at = Some(at);
    }
    Ok(())
  }

  async fn list_reviews(&self) -> AppResult<Vec<Review>> {
    let mut reviews = self.tables.read().reviews.clone();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(reviews)
  }

  async fn insert_review(&self, review: &Review) -> AppResult<()> {
    self.tables.write().reviews.push(review.clone());
    Ok(())
  }

  async fn list_gallery(&self, filter: &GalleryFilter) -> AppResult<Vec<GalleryItem>> {
    let mut items: Vec<GalleryItem> = self
      .tables
      .read()
      .gallery
      .iter()
      .filter(|g| filter.matches(g))
      .cloned()
      .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
  }

  async fn insert_gallery_item(&self, item: &GalleryItem) -> AppResult<()> {
    let mut tables = self.tables.write();
    if tables.gallery.iter().any(|g| g.id == item.id) {
      return Err(AppError::Conflict(format!("Gallery item {} already exists", item.id)));
    }
    tables.gallery.push(item.clone());
    Ok(())
  }

  async fn update_gallery_item(&self, id: Uuid, input: &GalleryItemInput, at: DateTime<Utc>) -> AppResult<Option<GalleryItem>> {
    let mut tables = self.tables.write();
    Ok(tables.gallery.iter_mut().find(|g| g.id == id).map(|item| {
      item.title = input.title.trim().to_string();
      item.image_url = input.image_url.trim().to_string();
      if let Some(kind) = input.kind {
        item.kind = kind;
      }
      item.location = input.location.trim().to_string();
      item.updated_at = at;
      item.clone()
    }))
  }

  async fn delete_gallery_item(&self, id: Uuid) -> AppResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.gallery.len();
    tables.gallery.retain(|g| g.id != id);
    Ok(tables.gallery.len() < before)
  }

  async fn list_published_posts(&self) -> AppResult<Vec<BlogPost>> {
    let mut posts: Vec<BlogPost> = self
      .tables
      .read()
      .posts
      .iter()
      .filter(|p| p.status == BlogStatus::Published)
      .cloned()
      .collect();
    posts.sort_by(|a, b| b.display_date().cmp(&a.display_date()));
    Ok(posts)
  }

  async fn get_published_post(&self, id: Uuid) -> AppResult<Option<BlogPost>> {
    Ok(
      self
        .tables
        .read()
        .posts
        .iter()
        .find(|p| p.id == id && p.status == BlogStatus::Published)
        .cloned(),
    )
  }
}
