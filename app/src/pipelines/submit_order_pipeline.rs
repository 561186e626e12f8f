// foodtruck/src/pipelines/submit_order_pipeline.rs

//! `POST /api/v1/orders`: validate, price, persist, then mirror the order at
//! the payments provider. A failure after `persist_order` cancels the local
//! order through its compensation.

use std::collections::HashMap;

use crate::domain::slots::{parse_date, parse_slot, pickup_slots};
use crate::domain::{calculate_tax, Cart};
use crate::errors::AppError;
use crate::models::{Order, OrderItem, OrderStatus};
use crate::pipelines::contexts::SubmitOrderCtxData;
use crate::services::gateway::{RemoteLineItem, RemoteOrderRequest};
use chrono::Utc;
use orderflow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, warn};
use uuid::Uuid;

pub fn register_submit_order_pipeline(registry: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<SubmitOrderCtxData, AppError>::new(&[
    ("validate_submission", false, None),
    ("price_cart", false, None),
    ("persist_order", false, None),
    ("create_remote_order", false, None),
    ("record_remote_order", false, None),
  ]);

  // Step 1: every field well-formed before anything leaves the process.
  p.on_step("validate_submission", |ctx_data: ContextData<SubmitOrderCtxData>| {
    Box::pin(async move {
      let (request, store, today) =
        ctx_data.with(|d| (d.request.clone(), d.app_state.store.clone(), d.app_state.local_today()));

      let required = [
        ("customer name", &request.customer_name),
        ("customer email", &request.customer_email),
        ("customer phone", &request.customer_phone),
      ];
      if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(AppError::Validation(format!("Missing {}", field)));
      }
      if request.items.is_empty() {
        return Err(AppError::Validation("Cart is empty".to_string()));
      }
      if request
        .items
        .iter()
        .any(|line| line.quantity == 0 || i32::try_from(line.quantity).is_err())
      {
        return Err(AppError::Validation("Item quantities must be positive".to_string()));
      }

      let date = parse_date(&request.date)
        .ok_or_else(|| AppError::Validation(format!("Invalid pickup date '{}'", request.date)))?;
      let time = parse_slot(&request.time)
        .ok_or_else(|| AppError::Validation(format!("Invalid pickup time '{}'", request.time)))?;

      let location = store
        .get_location(request.location_id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown location {}", request.location_id)))?;

      if date < today {
        return Err(AppError::Validation(format!("Pickup date {} is in the past", date)));
      }
      let offered = store
        .schedules_on(date, Some(location.id))
        .await?
        .iter()
        .any(|s| pickup_slots(s.start_time, s.end_time).contains(&time));
      if !offered {
        return Err(AppError::Validation(format!(
          "No pickup at {} on {} for this location",
          request.time.trim(),
          date
        )));
      }

      ctx_data.update(|d| {
        d.location = Some(location);
        d.pickup_time = Some(date.and_time(time));
      });
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: prices come from the store, never from the client.
  p.on_step("price_cart", |ctx_data: ContextData<SubmitOrderCtxData>| {
    Box::pin(async move {
      let (lines, address, store) = ctx_data.with(|d| {
        (
          d.request.items.clone(),
          d.location.as_ref().map(|l| l.address.clone()).unwrap_or_default(),
          d.app_state.store.clone(),
        )
      });

      let ids: Vec<Uuid> = lines.iter().map(|l| l.menu_item_id).collect();
      let items: HashMap<Uuid, _> = store
        .menu_items_by_ids(&ids)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

      let mut cart = Cart::new();
      for line in &lines {
        let item = items
          .get(&line.menu_item_id)
          .ok_or_else(|| AppError::Validation(format!("Unknown menu item {}", line.menu_item_id)))?;
        cart.add_quantity(item, line.quantity);
      }
      // Repeated lines for one item are merged above; the sum must still fit a stored quantity.
      if let Some(line) = cart.lines().iter().find(|l| i32::try_from(l.quantity).is_err()) {
        return Err(AppError::Validation(format!("Quantity for '{}' is too large", line.item.name)));
      }

      let subtotal = cart.subtotal();
      let tax = calculate_tax(subtotal, &address);
      let total = cart.total(calculate_tax, &address);
      info!(%subtotal, %tax, %total, "Cart priced.");

      ctx_data.update(|d| {
        d.cart = cart;
        d.subtotal = subtotal;
        d.tax = tax;
        d.total = total;
      });
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: order and items land together or not at all.
  p.on_step("persist_order", |ctx_data: ContextData<SubmitOrderCtxData>| {
    Box::pin(async move {
      let now = Utc::now();
      let Some(pickup_time) = ctx_data.with(|d| d.pickup_time) else {
        return Err(AppError::Internal("Pickup time missing before persisting the order".to_string()));
      };
      let (order, items, store) = ctx_data.with(|d| {
        let order = Order {
          id: Uuid::new_v4(),
          customer_name: d.request.customer_name.trim().to_string(),
          customer_email: d.request.customer_email.trim().to_string(),
          customer_phone: d.request.customer_phone.trim().to_string(),
          location_id: d.request.location_id,
          pickup_time,
          total_amount: d.total,
          status: OrderStatus::Pending,
          square_order_id: None,
          square_payment_id: None,
          created_at: now,
          updated_at: now,
        };
        let items: Result<Vec<OrderItem>, AppError> = d
          .cart
          .lines()
          .iter()
          .map(|line| {
            let quantity = i32::try_from(line.quantity)
              .map_err(|_| AppError::Validation(format!("Quantity for '{}' is too large", line.item.name)))?;
            Ok(OrderItem {
              id: Uuid::new_v4(),
              order_id: order.id,
              menu_item_id: line.item.id,
              quantity,
              price: line.item.price,
            })
          })
          .collect();
        (order, items, d.app_state.store.clone())
      });
      let items = items?;

      store.insert_order_with_items(&order, &items).await?;
      info!(order_id = %order.id, items = items.len(), "Order persisted as pending.");
      ctx_data.update(|d| d.order_id = Some(order.id));
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.compensate_step("persist_order", |ctx_data: ContextData<SubmitOrderCtxData>| {
    Box::pin(async move {
      let (order_id, store) = ctx_data.with(|d| (d.order_id, d.app_state.store.clone()));
      let Some(order_id) = order_id else {
        return Ok(());
      };
      warn!(%order_id, "Cancelling order after a failed submission.");
      store
        .update_order_status(order_id, OrderStatus::Cancelled, Utc::now())
        .await?;
      Ok::<_, AppError>(())
    })
  });

  // Step 4: the local order id doubles as the provider idempotency key.
  p.on_step("create_remote_order", |ctx_data: ContextData<SubmitOrderCtxData>| {
    Box::pin(async move {
      let Some(order_id) = ctx_data.with(|d| d.order_id) else {
        return Err(AppError::Internal("Order id missing before creating the remote order".to_string()));
      };
      let (request, gateway) = ctx_data.with(|d| {
        let line_items = d
          .cart
          .lines()
          .iter()
          .map(|line| RemoteLineItem {
            catalog_object_id: line.item.square_variation_id.clone(),
            name: line.item.name.clone(),
            quantity: line.quantity,
            base_price: line.item.price,
          })
          .collect();
        (
          RemoteOrderRequest {
            idempotency_key: order_id.to_string(),
            line_items,
          },
          d.app_state.gateway.clone(),
        )
      });

      let remote = gateway.create_order(&request).await?;
      info!(%order_id, remote_order_id = %remote.id, "Remote order created.");
      ctx_data.update(|d| d.remote_order_id = Some(remote.id));
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5
  p.on_step("record_remote_order", |ctx_data: ContextData<SubmitOrderCtxData>| {
    Box::pin(async move {
      let (order_id, remote_order_id, store) =
        ctx_data.with(|d| (d.order_id, d.remote_order_id.clone(), d.app_state.store.clone()));
      let (Some(order_id), Some(remote_order_id)) = (order_id, remote_order_id) else {
        return Err(AppError::Internal("Order ids missing before recording the remote order".to_string()));
      };
      store.set_remote_order_id(order_id, &remote_order_id, Utc::now()).await?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(p);
}
