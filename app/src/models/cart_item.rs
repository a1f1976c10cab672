// mealcart/src/models/cart_item.rs

use serde::{Deserialize, Serialize};

/// Flat delivery charge added to every order.
pub const DELIVERY_FEE: u64 = 300;

/// One meal in the customer's cart, as held by the client view and the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
  pub meal_id: String,
  pub meal_name: String,
  pub unit_price: u32,
  /// Always >= 1 while the item is in a cart.
  pub quantity: u32,
  pub stock_limit: u32,
}

impl CartLineItem {
  pub fn line_total(&self) -> u64 {
    u64::from(self.unit_price) * u64::from(self.quantity)
  }

  pub fn at_stock_limit(&self) -> bool {
    self.quantity >= self.stock_limit
  }
}

/// Derived amounts; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
  pub subtotal: u64,
  pub delivery_fee: u64,
  pub total: u64,
}

impl CartTotals {
  pub fn from_items(items: &[CartLineItem]) -> Self {
    let subtotal = items.iter().map(CartLineItem::line_total).sum();
    Self {
      subtotal,
      delivery_fee: DELIVERY_FEE,
      total: subtotal + DELIVERY_FEE,
    }
  }
}

/// The server's cart record (`GET /cart/{customer_id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCart {
  #[serde(alias = "_id")]
  pub id: String,
  pub customer_id: String,
  #[serde(default)]
  pub items: Vec<RemoteCartItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartItem {
  pub meal_id: String,
  pub meal_name: String,
  pub price: u32,
  pub quantity: u32,
}

/// Body of `POST /cart/add-to-cart`. Creates the cart when the customer has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
  pub customer_id: String,
  pub meal_id: String,
  pub meal_name: String,
  pub price: u32,
  pub quantity: u32,
}

/// Body of `PUT /cart/update-cart/{cart_id}`: the absolute new quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
  pub meal_id: String,
  pub quantity: u32,
}

impl From<&CartLineItem> for UpdateCartRequest {
  fn from(item: &CartLineItem) -> Self {
    Self {
      meal_id: item.meal_id.clone(),
      quantity: item.quantity,
    }
  }
}
