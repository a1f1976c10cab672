// mealcart/src/models/payment.rs

use super::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  /// Cash on delivery: collected by the rider.
  Pending,
  Paid,
  Failed,
}

/// Body of `POST /payments/add-payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
  pub customer_id: String,
  pub amount: u64,
  pub payment_method: PaymentMethod,
  pub status: PaymentStatus,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
  #[serde(alias = "_id")]
  pub id: String,
  pub customer_id: String,
  pub amount: u64,
  pub payment_method: PaymentMethod,
  pub status: PaymentStatus,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}
