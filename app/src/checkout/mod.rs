// mealcart/src/checkout/mod.rs

//! Checkout: form validation and the linear state machine that turns a cart
//! into a payment record and an order.

pub mod machine;
pub mod validation;

pub use machine::{CheckoutMachine, CheckoutState, Navigation};
pub use validation::{is_plausible_address, is_valid_phone, validate_checkout};

use crate::models::{CartLineItem, CartTotals, OrderLine, ValidatedCheckout};
use serde::{Deserialize, Serialize};

/// Validated input plus the cart snapshot taken at submit time. This is what
/// gets ordered, whatever happens to the live cart afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
  pub checkout: ValidatedCheckout,
  pub lines: Vec<OrderLine>,
  pub totals: CartTotals,
}

impl OrderDraft {
  pub fn new(checkout: ValidatedCheckout, items: &[CartLineItem]) -> Self {
    Self {
      checkout,
      lines: items.iter().map(OrderLine::from).collect(),
      totals: CartTotals::from_items(items),
    }
  }
}

/// Payload handed to the external card-capture flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHandoff {
  pub customer_id: String,
  #[serde(flatten)]
  pub draft: OrderDraft,
}
