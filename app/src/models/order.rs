// mealcart/src/models/order.rs

use super::{CartLineItem, CartTotals, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Preparing,
  Dispatched,
  Delivered,
  Cancelled,
}

/// Snapshot of one cart line at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  pub meal_id: String,
  pub meal_name: String,
  pub unit_price: u32,
  pub quantity: u32,
  pub line_total: u64,
}

impl From<&CartLineItem> for OrderLine {
  fn from(item: &CartLineItem) -> Self {
    Self {
      meal_id: item.meal_id.clone(),
      meal_name: item.meal_name.clone(),
      unit_price: item.unit_price,
      quantity: item.quantity,
      line_total: item.line_total(),
    }
  }
}

/// Body of `POST /orders/add-order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  pub customer_id: String,
  pub payment_id: String,
  pub payment_method: PaymentMethod,
  pub items: Vec<OrderLine>,
  pub delivery_address: String,
  pub contact_phone: String,
  pub is_gift: bool,
  #[serde(flatten)]
  pub totals: CartTotals,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(alias = "_id")]
  pub id: String,
  pub customer_id: String,
  pub payment_id: String,
  pub payment_method: PaymentMethod,
  pub items: Vec<OrderLine>,
  pub delivery_address: String,
  pub contact_phone: String,
  #[serde(default)]
  pub is_gift: bool,
  #[serde(flatten)]
  pub totals: CartTotals,
  #[serde(default)]
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}
