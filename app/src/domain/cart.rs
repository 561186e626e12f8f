// foodtruck/src/domain/cart.rs

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::MenuItem;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
  pub item: MenuItem,
  pub quantity: u32,
}

impl CartLine {
  pub fn line_total(&self) -> Decimal {
    self.item.price * Decimal::from(self.quantity)
  }
}

/// Selected menu items in insertion order, keyed by menu item id.
/// A line present in the cart always has a quantity of at least one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, item: &MenuItem) {
    self.add_quantity(item, 1);
  }

  /// Adds `quantity` units at once; zero is ignored. The merged quantity
  /// saturates at `u32::MAX`.
  pub fn add_quantity(&mut self, item: &MenuItem, quantity: u32) {
    if quantity == 0 {
      return;
    }
    match self.lines.iter_mut().find(|l| l.item.id == item.id) {
      Some(line) => line.quantity = line.quantity.saturating_add(quantity),
      None => self.lines.push(CartLine {
        item: item.clone(),
        quantity,
      }),
    }
  }

  /// Decrements the line for `item`, dropping it at zero. Absent items are ignored.
  pub fn remove(&mut self, item: &MenuItem) {
    if let Some(idx) = self.lines.iter().position(|l| l.item.id == item.id) {
      if self.lines[idx].quantity > 1 {
        self.lines[idx].quantity -= 1;
      } else {
        self.lines.remove(idx);
      }
    }
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn quantity_of(&self, item_id: Uuid) -> u32 {
    self
      .lines
      .iter()
      .find(|l| l.item.id == item_id)
      .map_or(0, |l| l.quantity)
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }

  pub fn subtotal(&self) -> Decimal {
    self.lines.iter().map(CartLine::line_total).sum()
  }

  /// Subtotal plus `tax_policy(subtotal, address)`.
  pub fn total(&self, tax_policy: impl Fn(Decimal, &str) -> Decimal, address: &str) -> Decimal {
    let subtotal = self.subtotal();
    subtotal + tax_policy(subtotal, address)
  }
}
