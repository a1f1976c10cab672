// mealcart/src/history.rs

//! Past orders of a customer, with date-range filtering for reports.

use crate::errors::Result;
use crate::models::Order;
use crate::services::MealOrderApi;
use chrono::NaiveDate;
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct OrderHistory {
  /// Newest first.
  orders: Vec<Order>,
}

impl OrderHistory {
  #[instrument(skip(api))]
  pub async fn load(api: &dyn MealOrderApi, customer_id: &str) -> Result<Self> {
    let orders = api.fetch_orders(customer_id).await?;
    tracing::info!(count = orders.len(), "Order history loaded.");
    Ok(Self::from_orders(orders))
  }

  pub fn from_orders(mut orders: Vec<Order>) -> Self {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Self { orders }
  }

  pub fn orders(&self) -> &[Order] {
    &self.orders
  }

  pub fn is_empty(&self) -> bool {
    self.orders.is_empty()
  }

  /// Orders placed on days within `[from, to]`, both ends inclusive and
  /// either end open when `None`. An inverted range matches nothing.
  pub fn between(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<&Order> {
    self
      .orders
      .iter()
      .filter(|order| {
        let day = order.created_at.date_naive();
        from.map_or(true, |from| day >= from) && to.map_or(true, |to| day <= to)
      })
      .collect()
  }

  pub fn total_spent(orders: &[&Order]) -> u64 {
    orders.iter().map(|order| order.totals.total).sum()
  }
}
