// mealcart/src/models/checkout.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
  #[serde(rename = "Cash On Delivery")]
  CashOnDelivery,
  #[serde(rename = "Card Payment")]
  CardPayment,
}

impl PaymentMethod {
  pub const CASH_ON_DELIVERY: &'static str = "Cash On Delivery";
  pub const CARD_PAYMENT: &'static str = "Card Payment";

  pub fn as_str(self) -> &'static str {
    match self {
      PaymentMethod::CashOnDelivery => Self::CASH_ON_DELIVERY,
      PaymentMethod::CardPayment => Self::CARD_PAYMENT,
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment method '{0}'")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
  type Err = UnknownPaymentMethod;

  /// Only the two exact literals are accepted.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      Self::CASH_ON_DELIVERY => Ok(PaymentMethod::CashOnDelivery),
      Self::CARD_PAYMENT => Ok(PaymentMethod::CardPayment),
      other => Err(UnknownPaymentMethod(other.to_string())),
    }
  }
}

/// Raw checkout form, exactly as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
  pub delivery_address: String,
  pub contact_phone: String,
  pub payment_method: String,
  pub gift: bool,
  pub for_self: bool,
}

/// Who the order is for. Exactly one of the two form flags selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Recipient {
  Gift,
  ForSelf,
}

/// Checkout input after it passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedCheckout {
  pub delivery_address: String,
  pub contact_phone: String,
  pub payment_method: PaymentMethod,
  pub recipient: Recipient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
  Cart,
  Recipient,
  DeliveryAddress,
  ContactPhone,
  PaymentMethod,
}

impl CheckoutField {
  pub fn label(self) -> &'static str {
    match self {
      CheckoutField::Cart => "cart",
      CheckoutField::Recipient => "recipient",
      CheckoutField::DeliveryAddress => "delivery address",
      CheckoutField::ContactPhone => "contact phone",
      CheckoutField::PaymentMethod => "payment method",
    }
  }
}

/// Field-level validation messages, one per field at most.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<CheckoutField, String>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, field: CheckoutField, message: impl Into<String>) {
    self.0.insert(field, message.into());
  }

  pub fn get(&self, field: CheckoutField) -> Option<&str> {
    self.0.get(&field).map(String::as_str)
  }

  pub fn contains(&self, field: CheckoutField) -> bool {
    self.0.contains_key(&field)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &str)> {
    self.0.iter().map(|(f, m)| (*f, m.as_str()))
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", field.label(), message)?;
      first = false;
    }
    Ok(())
  }
}
