// foodtruck/src/pipelines/payment_pipeline.rs

//! `POST /api/v1/orders/{id}/payment`: charges a card token for a submitted
//! order. Nothing is written locally unless the provider accepted the charge.

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::pipelines::contexts::{CapturePaymentCtxData, ConfirmationCustomer, ConfirmationLine, OrderConfirmation};
use crate::services::gateway::PaymentRequest;
use chrono::Utc;
use orderflow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, warn};

pub fn register_payment_pipeline(registry: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<CapturePaymentCtxData, AppError>::new(&[
    ("load_order", false, None),
    ("charge_card", false, None),
    ("record_payment", false, None),
    ("build_confirmation", false, None),
  ]);

  p.on_step("load_order", |ctx_data: ContextData<CapturePaymentCtxData>| {
    Box::pin(async move {
      let (order_id, nonce_missing, store) =
        ctx_data.with(|d| (d.order_id, d.nonce.trim().is_empty(), d.app_state.store.clone()));
      if nonce_missing {
        return Err(AppError::Validation("Missing payment token".to_string()));
      }

      let order = store
        .get_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;
      if order.status == OrderStatus::Cancelled {
        return Err(AppError::Conflict(format!("Order {} was cancelled", order_id)));
      }
      if order.square_payment_id.is_some() {
        return Err(AppError::Conflict(format!("Order {} is already paid", order_id)));
      }
      let Some(remote_order_id) = order.square_order_id.clone() else {
        warn!(%order_id, "Payment attempted on an order without a remote order.");
        return Err(AppError::Conflict(format!(
          "Order {} has no remote order; it cannot be paid",
          order_id
        )));
      };

      let items = store.order_items(order_id).await?;
      ctx_data.update(|d| {
        d.order = Some(order);
        d.items = items;
        d.remote_order_id = Some(remote_order_id);
      });
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // The amount is the stored total; the client never supplies it here.
  p.on_step("charge_card", |ctx_data: ContextData<CapturePaymentCtxData>| {
    Box::pin(async move {
      let (request, gateway) = ctx_data.with(|d| {
        (
          PaymentRequest {
            remote_order_id: d.remote_order_id.clone().unwrap_or_default(),
            source_id: d.nonce.clone(),
            amount: d.order.as_ref().map(|o| o.total_amount).unwrap_or_default(),
          },
          d.app_state.gateway.clone(),
        )
      });
      if request.remote_order_id.is_empty() {
        return Err(AppError::Internal("Remote order id missing before charging".to_string()));
      }

      let payment = gateway.create_payment(&request).await?;
      info!(remote_order_id = %request.remote_order_id, payment_id = %payment.id, status = %payment.status, "Card charged.");
      ctx_data.update(|d| d.payment_id = Some(payment.id));
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("record_payment", |ctx_data: ContextData<CapturePaymentCtxData>| {
    Box::pin(async move {
      let (order_id, payment_id, store) =
        ctx_data.with(|d| (d.order_id, d.payment_id.clone(), d.app_state.store.clone()));
      let Some(payment_id) = payment_id else {
        return Err(AppError::Internal("Payment id missing before recording".to_string()));
      };
      if !store.set_payment_id(order_id, &payment_id, Utc::now()).await? {
        return Err(AppError::Conflict(format!(
          "Order {} was paid concurrently",
          order_id
        )));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("build_confirmation", |ctx_data: ContextData<CapturePaymentCtxData>| {
    Box::pin(async move {
      let (order, items, remote_order_id, payment_id, store) = ctx_data.with(|d| {
        (
          d.order.clone(),
          d.items.clone(),
          d.remote_order_id.clone().unwrap_or_default(),
          d.payment_id.clone().unwrap_or_default(),
          d.app_state.store.clone(),
        )
      });
      let Some(order) = order else {
        return Err(AppError::Internal("Order missing before confirmation".to_string()));
      };

      let ids: Vec<_> = items.iter().map(|i| i.menu_item_id).collect();
      let names: HashMap<_, _> = store
        .menu_items_by_ids(&ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
      let location_name = store
        .get_location(order.location_id)
        .await?
        .map(|l| l.name)
        .unwrap_or_default();

      let confirmation = OrderConfirmation {
        order_id: order.id,
        remote_order_id,
        payment_id,
        customer: ConfirmationCustomer {
          name: order.customer_name.clone(),
          email: order.customer_email.clone(),
          phone: order.customer_phone.clone(),
        },
        items: items
          .iter()
          .map(|item| ConfirmationLine {
            menu_item_id: item.menu_item_id,
            name: names.get(&item.menu_item_id).cloned().unwrap_or_default(),
            quantity: item.quantity,
            price: item.price,
          })
          .collect(),
        pickup_time: order.pickup_time,
        total: order.total_amount,
        location_name,
      };
      ctx_data.update(|d| d.confirmation = Some(confirmation));
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(p);
}
