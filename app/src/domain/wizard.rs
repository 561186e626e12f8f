// foodtruck/src/domain/wizard.rs

//! Four-stage ordering flow: customer info, schedule, items by category, review.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::models::{MenuCategory, MenuItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "category", rename_all = "snake_case")]
pub enum WizardStage {
  CustomerInfo,
  ScheduleSelection,
  ItemSelection(MenuCategory),
  Review,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
  #[error("Add at least one item before continuing")]
  EmptyCart,
  #[error("Already at the first step")]
  AtFirstStage,
  #[error("Review is the last step")]
  AtLastStage,
  #[error("Orders can only be submitted from the review step")]
  NotInReview,
  #[error("Missing {0}")]
  Incomplete(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderLine {
  pub menu_item_id: Uuid,
  pub quantity: u32,
}

/// Body of `POST /api/v1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub location_id: Uuid,
  /// `YYYY-MM-DD`
  pub date: String,
  /// `h:mm AM/PM`
  pub time: String,
  pub items: Vec<SubmitOrderLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
  pub name: String,
  pub email: String,
  pub phone: String,
}

#[derive(Debug, Clone)]
pub struct OrderWizard {
  stage: WizardStage,
  pub customer: CustomerDetails,
  pub location_id: Option<Uuid>,
  pub date: Option<String>,
  pub time: Option<String>,
  cart: Cart,
}

impl Default for OrderWizard {
  fn default() -> Self {
    Self::new()
  }
}

impl OrderWizard {
  pub fn new() -> Self {
    Self {
      stage: WizardStage::CustomerInfo,
      customer: CustomerDetails::default(),
      location_id: None,
      date: None,
      time: None,
      cart: Cart::new(),
    }
  }

  pub fn stage(&self) -> WizardStage {
    self.stage
  }

  pub fn cart(&self) -> &Cart {
    &self.cart
  }

  pub fn add_item(&mut self, item: &MenuItem) {
    self.cart.add(item);
  }

  pub fn remove_item(&mut self, item: &MenuItem) {
    self.cart.remove(item);
  }

  pub fn select_schedule(&mut self, location_id: Uuid, date: impl Into<String>, time: impl Into<String>) {
    self.location_id = Some(location_id);
    self.date = Some(date.into());
    self.time = Some(time.into());
  }

  /// Whether the continue control is enabled. Item selection needs a non-empty cart.
  pub fn can_advance(&self) -> bool {
    match self.stage {
      WizardStage::ItemSelection(_) => !self.cart.is_empty(),
      WizardStage::Review => false,
      _ => true,
    }
  }

  pub fn advance(&mut self) -> Result<WizardStage, WizardError> {
    self.stage = match self.stage {
      WizardStage::CustomerInfo => WizardStage::ScheduleSelection,
      WizardStage::ScheduleSelection => WizardStage::ItemSelection(MenuCategory::first()),
      WizardStage::ItemSelection(_) if self.cart.is_empty() => return Err(WizardError::EmptyCart),
      WizardStage::ItemSelection(category) => match category.next() {
        Some(next) => WizardStage::ItemSelection(next),
        None => WizardStage::Review,
      },
      WizardStage::Review => return Err(WizardError::AtLastStage),
    };
    Ok(self.stage)
  }

  pub fn back(&mut self) -> Result<WizardStage, WizardError> {
    self.stage = match self.stage {
      WizardStage::CustomerInfo => return Err(WizardError::AtFirstStage),
      WizardStage::ScheduleSelection => WizardStage::CustomerInfo,
      WizardStage::ItemSelection(category) => match category.previous() {
        Some(prev) => WizardStage::ItemSelection(prev),
        None => WizardStage::ScheduleSelection,
      },
      WizardStage::Review => WizardStage::ItemSelection(MenuCategory::last()),
    };
    Ok(self.stage)
  }

  /// Request body for the submission endpoint. Only available from review.
  pub fn submission(&self) -> Result<SubmitOrderRequest, WizardError> {
    if self.stage != WizardStage::Review {
      return Err(WizardError::NotInReview);
    }
    if self.cart.is_empty() {
      return Err(WizardError::EmptyCart);
    }
    let location_id = self.location_id.ok_or(WizardError::Incomplete("location"))?;
    let date = self.date.clone().ok_or(WizardError::Incomplete("date"))?;
    let time = self.time.clone().ok_or(WizardError::Incomplete("time"))?;

    Ok(SubmitOrderRequest {
      customer_name: self.customer.name.clone(),
      customer_email: self.customer.email.clone(),
      customer_phone: self.customer.phone.clone(),
      location_id,
      date,
      time,
      items: self
        .cart
        .lines()
        .iter()
        .map(|l| SubmitOrderLine {
          menu_item_id: l.item.id,
          quantity: l.quantity,
        })
        .collect(),
    })
  }

  /// Clears the cart and returns to the first step after a successful order.
  pub fn reset(&mut self) {
    *self = Self::new();
  }
}
