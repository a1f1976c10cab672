// mealcart/src/cart/view.rs

use crate::errors::{AppError, Result};
use crate::models::{CartLineItem, CartTotals, Meal, RemoteCart};
use crate::services::CachedCart;
use mealcart_flow::ContextData;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartMutation {
  Add,
  Increase,
  Decrease,
  Remove,
}

impl CartMutation {
  pub fn as_str(self) -> &'static str {
    match self {
      CartMutation::Add => "add",
      CartMutation::Increase => "increase",
      CartMutation::Decrease => "decrease",
      CartMutation::Remove => "remove",
    }
  }
}

/// What a mutation will do to the view. Computed from the current view, then
/// committed under the write lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationPlan {
  /// First add of a meal.
  Insert(CartLineItem),
  /// Existing line with its new quantity.
  SetQuantity(CartLineItem),
  /// The line being removed.
  Delete(CartLineItem),
  Nothing,
}

/// The in-memory cart view model.
///
/// Holds at most one line per meal and never a line with quantity 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
  pub cart_id: Option<String>,
  pub items: Vec<CartLineItem>,
  in_flight: usize,
}

impl CartView {
  pub fn from_cached(cached: CachedCart) -> Self {
    let mut view = Self::default();
    view.replace_contents(cached.cart_id, cached.items);
    view
  }

  pub fn to_cached(&self) -> CachedCart {
    CachedCart {
      cart_id: self.cart_id.clone(),
      items: self.items.clone(),
    }
  }

  pub fn item(&self, meal_id: &str) -> Option<&CartLineItem> {
    self.items.iter().find(|item| item.meal_id == meal_id)
  }

  pub fn totals(&self) -> CartTotals {
    CartTotals::from_items(&self.items)
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Number of remote mutations still awaiting the server.
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  /// Works out what `mutation` would do, without touching the view.
  ///
  /// `meal` is only consulted for the first `Add` of a meal.
  pub fn plan(&self, mutation: CartMutation, meal_id: &str, meal: Option<&Meal>) -> Result<MutationPlan> {
    let existing = self.item(meal_id);
    match (mutation, existing) {
      (CartMutation::Add, None) => {
        let meal = meal.ok_or_else(|| AppError::NotFound(format!("Meal {}", meal_id)))?;
        if meal.stock == 0 {
          return Err(AppError::StockExceeded {
            meal_name: meal.name.clone(),
            limit: 0,
          });
        }
        Ok(MutationPlan::Insert(CartLineItem {
          meal_id: meal.id.clone(),
          meal_name: meal.name.clone(),
          unit_price: meal.price,
          quantity: 1,
          stock_limit: meal.stock,
        }))
      }
      (CartMutation::Add | CartMutation::Increase, Some(item)) => {
        if item.at_stock_limit() {
          return Err(AppError::StockExceeded {
            meal_name: item.meal_name.clone(),
            limit: item.stock_limit,
          });
        }
        Ok(MutationPlan::SetQuantity(CartLineItem {
          quantity: item.quantity + 1,
          ..item.clone()
        }))
      }
      (CartMutation::Decrease, Some(item)) => {
        // Going below 1 is what remove() is for.
        if item.quantity <= 1 {
          return Ok(MutationPlan::Nothing);
        }
        Ok(MutationPlan::SetQuantity(CartLineItem {
          quantity: item.quantity - 1,
          ..item.clone()
        }))
      }
      (CartMutation::Remove, Some(item)) => Ok(MutationPlan::Delete(item.clone())),
      (CartMutation::Remove, None) => Ok(MutationPlan::Nothing),
      (CartMutation::Increase | CartMutation::Decrease, None) => {
        Err(AppError::NotFound(format!("Meal {} in cart", meal_id)))
      }
    }
  }

  pub fn commit(&mut self, plan: &MutationPlan) {
    match plan {
      MutationPlan::Insert(line) | MutationPlan::SetQuantity(line) => {
        match self.items.iter_mut().find(|item| item.meal_id == line.meal_id) {
          Some(item) => *item = line.clone(),
          None => self.items.push(line.clone()),
        }
      }
      MutationPlan::Delete(line) => {
        self.items.retain(|item| item.meal_id != line.meal_id);
        if self.items.is_empty() {
          self.cart_id = None;
        }
      }
      MutationPlan::Nothing => {}
    }
  }

  /// Overwrites cart id and lines; the in-flight counter is left alone.
  pub fn replace_contents(&mut self, cart_id: Option<String>, items: Vec<CartLineItem>) {
    self.cart_id = cart_id;
    self.items = items.into_iter().filter(|item| item.quantity >= 1).collect();
  }
}

/// Turns a server cart into view lines, taking each line's stock limit from
/// the meal catalog.
///
/// Zero-quantity lines are dropped. Duplicate lines for one meal are folded
/// into one. A meal missing from the catalog gets its current quantity as
/// limit, so it can be decreased or removed but not increased. The same holds
/// for a line the server reports above the meal's stock: the limit is raised to
/// the quantity, keeping every line within its limit.
pub fn merge_stock_limits(remote: Option<&RemoteCart>, meals: &[Meal]) -> Vec<CartLineItem> {
  let Some(remote) = remote else {
    return Vec::new();
  };
  let stock_by_meal: HashMap<&str, u32> = meals.iter().map(|meal| (meal.id.as_str(), meal.stock)).collect();

  let mut items: Vec<CartLineItem> = Vec::with_capacity(remote.items.len());
  for remote_item in remote.items.iter().filter(|i| i.quantity >= 1) {
    if let Some(existing) = items.iter_mut().find(|i| i.meal_id == remote_item.meal_id) {
      warn!(meal_id = %remote_item.meal_id, "Server cart lists a meal twice; folding lines.");
      existing.quantity += remote_item.quantity;
      continue;
    }
    items.push(CartLineItem {
      meal_id: remote_item.meal_id.clone(),
      meal_name: remote_item.meal_name.clone(),
      unit_price: remote_item.price,
      quantity: remote_item.quantity,
      stock_limit: 0,
    });
  }

  for item in &mut items {
    item.stock_limit = match stock_by_meal.get(item.meal_id.as_str()) {
      Some(&stock) if stock >= item.quantity => stock,
      Some(&stock) => {
        warn!(meal_id = %item.meal_id, quantity = item.quantity, stock, "Cart line exceeds stock; freezing its quantity.");
        item.quantity
      }
      None => {
        warn!(meal_id = %item.meal_id, "Meal missing from catalog; freezing its quantity.");
        item.quantity
      }
    };
  }
  items
}

/// Counts one remote mutation as in flight for as long as it lives.
pub(crate) struct InFlightGuard {
  view: ContextData<CartView>,
}

impl InFlightGuard {
  pub(crate) fn begin(view: &ContextData<CartView>) -> Self {
    view.write().in_flight += 1;
    Self { view: view.clone() }
  }
}

impl Drop for InFlightGuard {
  fn drop(&mut self) {
    let mut view = self.view.write();
    view.in_flight = view.in_flight.saturating_sub(1);
  }
}
