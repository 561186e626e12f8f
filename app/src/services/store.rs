// foodtruck/src/services/store.rs

//! Persistence seam. `PgStore` is the production backend; the in-process
//! `MemoryStore` (see `memory_store.rs`) backs tests and local demos.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::Result as AppResult;
use crate::models::{
  BlogPost, GalleryFilter, GalleryItem, GalleryItemInput, Location, MenuItem, Order, OrderDetails, OrderFilter,
  OrderItem, OrderLineDetails, OrderStatus, Review, Schedule, SyncLog, WebhookEvent,
};

/// Outcome of `Store::delete_menu_item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemRemoval {
  Removed,
  NotFound,
  /// Order lines still point at the item; it was kept.
  Referenced,
}

#[async_trait]
pub trait Store: Send + Sync {
  async fn list_menu(&self) -> AppResult<Vec<MenuItem>>;
  async fn get_menu_item(&self, id: Uuid) -> AppResult<Option<MenuItem>>;
  async fn menu_items_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MenuItem>>;
  async fn insert_menu_item(&self, item: &MenuItem) -> AppResult<()>;
  async fn update_menu_item(&self, item: &MenuItem) -> AppResult<bool>;
  /// Caches a provider stock count on items with this variation id.
  async fn update_stock_by_variation(&self, variation_id: &str, quantity: i64, at: DateTime<Utc>) -> AppResult<u64>;
  /// Clears `last_synced_at` on items with this provider item id.
  async fn mark_item_unsynced(&self, square_item_id: &str) -> AppResult<u64>;
  /// Deletes an item unless an order line refers to it.
  async fn delete_menu_item(&self, id: Uuid) -> AppResult<MenuItemRemoval>;
  /// Sets `display_order` to each id's 1-based position. Returns the number of items touched.
  async fn reorder_menu(&self, ids: &[Uuid], at: DateTime<Utc>) -> AppResult<u64>;

  async fn list_locations(&self) -> AppResult<Vec<Location>>;
  async fn get_location(&self, id: Uuid) -> AppResult<Option<Location>>;

  /// Schedules on or after `from`, by date then start time.
  async fn list_schedules(&self, from: NaiveDate) -> AppResult<Vec<Schedule>>;
  async fn schedules_on(&self, date: NaiveDate, location_id: Option<Uuid>) -> AppResult<Vec<Schedule>>;

  /// Writes the order and all its items atomically.
  async fn insert_order_with_items(&self, order: &Order, items: &[OrderItem]) -> AppResult<()>;
  async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>>;
  async fn order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>>;
  async fn list_orders(&self, filter: &OrderFilter) -> AppResult<Vec<Order>>;
  async fn set_remote_order_id(&self, order_id: Uuid, remote_order_id: &str, at: DateTime<Utc>) -> AppResult<()>;
  /// Returns false when the order already carries a payment id.
  async fn set_payment_id(&self, order_id: Uuid, payment_id: &str, at: DateTime<Utc>) -> AppResult<bool>;
  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus, at: DateTime<Utc>) -> AppResult<Option<Order>>;
  /// Cancels pending orders created before `created_before` that never got a remote order.
  async fn cancel_orphaned_orders(&self, created_before: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<Vec<Uuid>>;

  /// Inserts the event unless one with the same dedupe key exists; returns the stored row.
  async fn record_webhook_event(&self, event: &WebhookEvent) -> AppResult<WebhookEvent>;
  async fn mark_webhook_processed(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

  async fn insert_sync_log(&self, log: &SyncLog) -> AppResult<()>;
  async fn finish_sync_log(&self, id: Uuid, status: &str, details: &serde_json::Value, at: DateTime<Utc>) -> AppResult<()>;

  /// Newest first.
  async fn list_reviews(&self) -> AppResult<Vec<Review>>;
  async fn insert_review(&self, review: &Review) -> AppResult<()>;

  /// Newest first.
  async fn list_gallery(&self, filter: &GalleryFilter) -> AppResult<Vec<GalleryItem>>;
  async fn insert_gallery_item(&self, item: &GalleryItem) -> AppResult<()>;
  async fn update_gallery_item(&self, id: Uuid, input: &GalleryItemInput, at: DateTime<Utc>) -> AppResult<Option<GalleryItem>>;
  async fn delete_gallery_item(&self, id: Uuid) -> AppResult<bool>;

  /// Published posts, most recently published first.
  async fn list_published_posts(&self) -> AppResult<Vec<BlogPost>>;
  async fn get_published_post(&self, id: Uuid) -> AppResult<Option<BlogPost>>;

  /// `list_orders` with each order's location and lines, and the menu item behind every line.
  async fn list_order_details(&self, filter: &OrderFilter) -> AppResult<Vec<OrderDetails>> {
    let orders = self.list_orders(filter).await?;
    let locations: HashMap<Uuid, Location> = self
      .list_locations()
      .await?
      .into_iter()
      .map(|l| (l.id, l))
      .collect();

    let mut lines = Vec::with_capacity(orders.len());
    for order in &orders {
      lines.push(self.order_items(order.id).await?);
    }
    let item_ids: Vec<Uuid> = lines
      .iter()
      .flatten()
      .map(|l| l.menu_item_id)
      .collect::<HashSet<_>>()
      .into_iter()
      .collect();
    let menu: HashMap<Uuid, MenuItem> = self
      .menu_items_by_ids(&item_ids)
      .await?
      .into_iter()
      .map(|m| (m.id, m))
      .collect();

    Ok(
      orders
        .into_iter()
        .zip(lines)
        .map(|(order, order_lines)| OrderDetails {
          location: locations.get(&order.location_id).cloned(),
          items: order_lines
            .into_iter()
            .map(|order_item| OrderLineDetails {
              menu_item: menu.get(&order_item.menu_item_id).cloned(),
              order_item,
            })
            .collect(),
          order,
        })
        .collect(),
    )
  }
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  /// Inserts the sample catalog when the menu is empty.
  #[instrument(name = "PgStore::seed", skip(self), err(Display))]
  pub async fn seed_if_empty(&self) -> AppResult<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM menu_items")
      .fetch_one(&self.pool)
      .await?;
    if count > 0 {
      info!(count, "Menu already populated, skipping seed.");
      return Ok(());
    }
    let seed = crate::services::seed::sample_data(Utc::now());
    for location in &seed.locations {
      sqlx::query("INSERT INTO locations (id, name, address, image_url, latitude, longitude) VALUES ($1, $2, $3, $4, $5, $6)")
        .bind(location.id)
        .bind(&location.name)
        .bind(&location.address)
        .bind(&location.image_url)
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&self.pool)
        .await?;
    }
    for schedule in &seed.schedules {
      sqlx::query("INSERT INTO schedules (id, location_id, date, start_time, end_time) VALUES ($1, $2, $3, $4, $5)")
        .bind(schedule.id)
        .bind(schedule.location_id)
        .bind(schedule.date)
        .bind(schedule.start_time)
        .bind(schedule.end_time)
        .execute(&self.pool)
        .await?;
    }
    for item in &seed.menu {
      self.insert_menu_item(item).await?;
    }
    for review in &seed.reviews {
      self.insert_review(review).await?;
    }
    for photo in &seed.gallery {
      self.insert_gallery_item(photo).await?;
    }
    for post in &seed.posts {
      let sql = format!(
        "INSERT INTO blog_posts ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        POST_COLUMNS
      );
      sqlx::query(&sql)
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.category)
        .bind(&post.author)
        .bind(post.status)
        .bind(post.published_at)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;
    }
    info!(items = seed.menu.len(), "Seeded sample catalog.");
    Ok(())
  }
}

const MENU_COLUMNS: &str = "id, name, description, price, category, is_vegetarian, is_spicy, is_gluten_free, \
  display_order, image_url, square_item_id, square_variation_id, square_stock, last_synced_at, created_at, updated_at";

const REVIEW_COLUMNS: &str = "id, customer_name, rating, comment, image_url, created_at";

const GALLERY_COLUMNS: &str = "id, title, image_url, type, location, created_at, updated_at";

const POST_COLUMNS: &str =
  "id, title, excerpt, content, image_url, category, author, status, published_at, created_at";

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, location_id, pickup_time, \
  total_amount, status, square_order_id, square_payment_id, created_at, updated_at";

#[async_trait]
impl Store for PgStore {
  async fn list_menu(&self) -> AppResult<Vec<MenuItem>> {
    let sql = format!("SELECT {} FROM menu_items ORDER BY category, display_order, name", MENU_COLUMNS);
    Ok(sqlx::query_as::<_, MenuItem>(&sql).fetch_all(&self.pool).await?)
  }

  async fn get_menu_item(&self, id: Uuid) -> AppResult<Option<MenuItem>> {
    let sql = format!("SELECT {} FROM menu_items WHERE id = $1", MENU_COLUMNS);
    Ok(sqlx::query_as::<_, MenuItem>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn menu_items_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MenuItem>> {
    let sql = format!("SELECT {} FROM menu_items WHERE id = ANY($1)", MENU_COLUMNS);
    Ok(sqlx::query_as::<_, MenuItem>(&sql).bind(ids).fetch_all(&self.pool).await?)
  }

  async fn insert_menu_item(&self, item: &MenuItem) -> AppResult<()> {
    let sql = format!(
      "INSERT INTO menu_items ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
      MENU_COLUMNS
    );
    sqlx::query(&sql)
      .bind(item.id)
      .bind(&item.name)
      .bind(&item.description)
      .bind(item.price)
      .bind(item.category)
      .bind(item.is_vegetarian)
      .bind(item.is_spicy)
      .bind(item.is_gluten_free)
      .bind(item.display_order)
      .bind(&item.image_url)
      .bind(&item.square_item_id)
      .bind(&item.square_variation_id)
      .bind(item.square_stock)
      .bind(item.last_synced_at)
      .bind(item.created_at)
      .bind(item.updated_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn update_menu_item(&self, item: &MenuItem) -> AppResult<bool> {
    let result = sqlx::query(
      "UPDATE menu_items SET name = $2, description = $3, price = $4, category = $5, is_vegetarian = $6, \
       is_spicy = $7, is_gluten_free = $8, display_order = $9, image_url = $10, square_item_id = $11, \
       square_variation_id = $12, updated_at = $13 WHERE id = $1",
    )
    .bind(item.id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.price)
    .bind(item.category)
    .bind(item.is_vegetarian)
    .bind(item.is_spicy)
    .bind(item.is_gluten_free)
    .bind(item.display_order)
    .bind(&item.image_url)
    .bind(&item.square_item_id)
    .bind(&item.square_variation_id)
    .bind(item.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn update_stock_by_variation(&self, variation_id: &str, quantity: i64, at: DateTime<Utc>) -> AppResult<u64> {
    let result = sqlx::query("UPDATE menu_items SET square_stock = $2, last_synced_at = $3 WHERE square_variation_id = $1")
      .bind(variation_id)
      .bind(quantity)
      .bind(at)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  async fn mark_item_unsynced(&self, square_item_id: &str) -> AppResult<u64> {
    let result = sqlx::query("UPDATE menu_items SET last_synced_at = NULL WHERE square_item_id = $1")
      .bind(square_item_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "PgStore::delete_menu_item", skip(self), err(Display))]
  async fn delete_menu_item(&self, id: Uuid) -> AppResult<MenuItemRemoval> {
    let deleted = sqlx::query(
      "DELETE FROM menu_items WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM order_items WHERE menu_item_id = $1)",
    )
    .bind(id)
    .execute(&self.pool)
    .await;
    match deleted {
      Ok(result) if result.rows_affected() > 0 => Ok(MenuItemRemoval::Removed),
      Ok(_) => {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM menu_items WHERE id = $1)")
          .bind(id)
          .fetch_one(&self.pool)
          .await?;
        Ok(if exists {
          MenuItemRemoval::Referenced
        } else {
          MenuItemRemoval::NotFound
        })
      }
      // An order line inserted concurrently trips the foreign key.
      Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => Ok(MenuItemRemoval::Referenced),
      Err(e) => Err(e.into()),
    }
  }

  #[instrument(name = "PgStore::reorder_menu", skip_all, fields(items = ids.len()), err(Display))]
  async fn reorder_menu(&self, ids: &[Uuid], at: DateTime<Utc>) -> AppResult<u64> {
    let mut tx = self.pool.begin().await?;
    let mut touched = 0;
    for (position, id) in (1_i32..).zip(ids) {
      let result = sqlx::query("UPDATE menu_items SET display_order = $2, updated_at = $3 WHERE id = $1")
        .bind(id)
        .bind(position)
        .bind(at)
        .execute(&mut *tx)
        .await?;
      touched += result.rows_affected();
    }
    tx.commit().await?;
    Ok(touched)
  }

  async fn list_locations(&self) -> AppResult<Vec<Location>> {
    Ok(
      sqlx::query_as::<_, Location>(
        "SELECT id, name, address, image_url, latitude, longitude FROM locations ORDER BY name",
      )
      .fetch_all(&self.pool)
      .await?,
    )
  }

  async fn get_location(&self, id: Uuid) -> AppResult<Option<Location>> {
    Ok(
      sqlx::query_as::<_, Location>(
        "SELECT id, name, address, image_url, latitude, longitude FROM locations WHERE id = $1",
      )
      .bind(id)
      .fetch_optional(&self.pool)
      .await?,
    )
  }

  async fn list_schedules(&self, from: NaiveDate) -> AppResult<Vec<Schedule>> {
    Ok(
      sqlx::query_as::<_, Schedule>(
        "SELECT id, location_id, date, start_time, end_time FROM schedules WHERE date >= $1 ORDER BY date, start_time",
      )
      .bind(from)
      .fetch_all(&self.pool)
      .await?,
    )
  }

  async fn schedules_on(&self, date: NaiveDate, location_id: Option<Uuid>) -> AppResult<Vec<Schedule>> {
    Ok(
      sqlx::query_as::<_, Schedule>(
        "SELECT id, location_id, date, start_time, end_time FROM schedules \
         WHERE date = $1 AND ($2::uuid IS NULL OR location_id = $2) ORDER BY start_time",
      )
      .bind(date)
      .bind(location_id)
      .fetch_all(&self.pool)
      .await?,
    )
  }

  #[instrument(name = "PgStore::insert_order_with_items", skip_all, fields(order_id = %order.id, items = items.len()), err(Display))]
  async fn insert_order_with_items(&self, order: &Order, items: &[OrderItem]) -> AppResult<()> {
    let mut tx = self.pool.begin().await?;
    let sql = format!(
      "INSERT INTO orders ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
      ORDER_COLUMNS
    );
    sqlx::query(&sql)
      .bind(order.id)
      .bind(&order.customer_name)
      .bind(&order.customer_email)
      .bind(&order.customer_phone)
      .bind(order.location_id)
      .bind(order.pickup_time)
      .bind(order.total_amount)
      .bind(order.status)
      .bind(&order.square_order_id)
      .bind(&order.square_payment_id)
      .bind(order.created_at)
      .bind(order.updated_at)
      .execute(&mut *tx)
      .await?;
    for item in items {
      sqlx::query("INSERT INTO order_items (id, order_id, menu_item_id, quantity, price) VALUES ($1, $2, $3, $4, $5)")
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
  }

  async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>> {
    let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
    Ok(sqlx::query_as::<_, Order>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    Ok(
      sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, menu_item_id, quantity, price FROM order_items WHERE order_id = $1",
      )
      .bind(order_id)
      .fetch_all(&self.pool)
      .await?,
    )
  }

  async fn list_orders(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
    let search = filter
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| format!("%{}%", s));
    let sql = format!(
      "SELECT {} FROM orders WHERE ($1::order_status_enum IS NULL OR status = $1) \
       AND ($2::uuid IS NULL OR location_id = $2) \
       AND ($3::text IS NULL OR customer_name ILIKE $3 OR id::text ILIKE $3) \
       ORDER BY created_at DESC",
      ORDER_COLUMNS
    );
    Ok(
      sqlx::query_as::<_, Order>(&sql)
        .bind(filter.status)
        .bind(filter.location_id)
        .bind(search)
        .fetch_all(&self.pool)
        .await?,
    )
  }

  async fn set_remote_order_id(&self, order_id: Uuid, remote_order_id: &str, at: DateTime<Utc>) -> AppResult<()> {
    sqlx::query("UPDATE orders SET square_order_id = $2, updated_at = $3 WHERE id = $1")
      .bind(order_id)
      .bind(remote_order_id)
      .bind(at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn set_payment_id(&self, order_id: Uuid, payment_id: &str, at: DateTime<Utc>) -> AppResult<bool> {
    let result = sqlx::query(
      "UPDATE orders SET square_payment_id = $2, updated_at = $3 WHERE id = $1 AND square_payment_id IS NULL",
    )
    .bind(order_id)
    .bind(payment_id)
    .bind(at)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus, at: DateTime<Utc>) -> AppResult<Option<Order>> {
    let sql = format!(
      "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
      ORDER_COLUMNS
    );
    Ok(
      sqlx::query_as::<_, Order>(&sql)
        .bind(order_id)
        .bind(status)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn cancel_orphaned_orders(&self, created_before: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
      "UPDATE orders SET status = 'cancelled', updated_at = $2 \
       WHERE status = 'pending' AND square_order_id IS NULL AND created_at < $1 RETURNING id",
    )
    .bind(created_before)
    .bind(at)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
  }

  async fn record_webhook_event(&self, event: &WebhookEvent) -> AppResult<WebhookEvent> {
    let inserted = sqlx::query_as::<_, WebhookEvent>(
      "INSERT INTO square_webhooks (id, dedupe_key, event_type, payload, processed, received_at, processed_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (dedupe_key) DO NOTHING \
       RETURNING id, dedupe_key, event_type, payload, processed, received_at, processed_at",
    )
    .bind(event.id)
    .bind(&event.dedupe_key)
    .bind(&event.event_type)
    .bind(&event.payload)
    .bind(event.processed)
    .bind(event.received_at)
    .bind(event.processed_at)
    .fetch_optional(&self.pool)
    .await?;
    if let Some(row) = inserted {
      return Ok(row);
    }
    Ok(
      sqlx::query_as::<_, WebhookEvent>(
        "SELECT id, dedupe_key, event_type, payload, processed, received_at, processed_at \
         FROM square_webhooks WHERE dedupe_key = $1",
      )
      .bind(&event.dedupe_key)
      .fetch_one(&self.pool)
      .await?,
    )
  }

  async fn mark_webhook_processed(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
    sqlx::query("UPDATE square_webhooks SET processed = TRUE, processed_at = $2 WHERE id = $1")
      .bind(id)
      .bind(at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn insert_sync_log(&self, log: &SyncLog) -> AppResult<()> {
    sqlx::query(
      "INSERT INTO square_sync_logs (id, sync_type, status, details, started_at, completed_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(log.id)
    .bind(&log.sync_type)
    .bind(&log.status)
    .bind(&log.details)
    .bind(log.started_at)
    .bind(log.completed_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn finish_sync_log(&self, id: Uuid, status: &str, details: &serde_json::Value, at: DateTime<Utc>) -> AppResult<()> {
    sqlx::query("UPDATE square_sync_logs SET status = $2, details = $3, completed_at = $4 WHERE id = $1")
      .bind(id)
      .bind(status)
      .bind(details)
      .bind(at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn list_reviews(&self) -> AppResult<Vec<Review>> {
    let sql = format!("SELECT {} FROM reviews ORDER BY created_at DESC", REVIEW_COLUMNS);
    Ok(sqlx::query_as::<_, Review>(&sql).fetch_all(&self.pool).await?)
  }

  async fn insert_review(&self, review: &Review) -> AppResult<()> {
    let sql = format!("INSERT INTO reviews ({}) VALUES ($1, $2, $3, $4, $5, $6)", REVIEW_COLUMNS);
    sqlx::query(&sql)
      .bind(review.id)
      .bind(&review.customer_name)
      .bind(review.rating)
      .bind(&review.comment)
      .bind(&review.image_url)
      .bind(review.created_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn list_gallery(&self, filter: &GalleryFilter) -> AppResult<Vec<GalleryItem>> {
    let sql = format!(
      "SELECT {} FROM gallery_items WHERE ($1::gallery_kind_enum IS NULL OR type = $1) \
       AND ($2::text IS NULL OR title ILIKE $2 OR location ILIKE $2) ORDER BY created_at DESC",
      GALLERY_COLUMNS
    );
    Ok(
      sqlx::query_as::<_, GalleryItem>(&sql)
        .bind(filter.kind)
        .bind(filter.search_term().map(|s| format!("%{}%", s)))
        .fetch_all(&self.pool)
        .await?,
    )
  }

  async fn insert_gallery_item(&self, item: &GalleryItem) -> AppResult<()> {
    let sql = format!("INSERT INTO gallery_items ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)", GALLERY_COLUMNS);
    sqlx::query(&sql)
      .bind(item.id)
      .bind(&item.title)
      .bind(&item.image_url)
      .bind(item.kind)
      .bind(&item.location)
      .bind(item.created_at)
      .bind(item.updated_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn update_gallery_item(&self, id: Uuid, input: &GalleryItemInput, at: DateTime<Utc>) -> AppResult<Option<GalleryItem>> {
    let sql = format!(
      "UPDATE gallery_items SET title = $2, image_url = $3, type = COALESCE($4, type), location = $5, updated_at = $6 \
       WHERE id = $1 RETURNING {}",
      GALLERY_COLUMNS
    );
    Ok(
      sqlx::query_as::<_, GalleryItem>(&sql)
        .bind(id)
        .bind(input.title.trim())
        .bind(input.image_url.trim())
        .bind(input.kind)
        .bind(input.location.trim())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn delete_gallery_item(&self, id: Uuid) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_published_posts(&self) -> AppResult<Vec<BlogPost>> {
    let sql = format!(
      "SELECT {} FROM blog_posts WHERE status = 'published' ORDER BY COALESCE(published_at, created_at) DESC",
      POST_COLUMNS
    );
    Ok(sqlx::query_as::<_, BlogPost>(&sql).fetch_all(&self.pool).await?)
  }

  async fn get_published_post(&self, id: Uuid) -> AppResult<Option<BlogPost>> {
    let sql = format!("SELECT {} FROM blog_posts WHERE id = $1 AND status = 'published'", POST_COLUMNS);
    Ok(sqlx::query_as::<_, BlogPost>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }
}
