// mealcart/src/models/meal.rs

use serde::{Deserialize, Serialize};

/// A menu entry as served by `GET /get-meals/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
  #[serde(alias = "_id")]
  pub id: String,
  #[serde(alias = "mealName")]
  pub name: String,
  pub price: u32,
  /// Units currently purchasable; this is the cart's stock limit.
  #[serde(default, alias = "quantity")]
  pub stock: u32,
  #[serde(default)]
  pub description: Option<String>,
}
