// mealcart/src/services/api.rs

//! The REST surface the client consumes, as a trait so the cart and checkout
//! logic can be driven against a fake in tests.

use crate::errors::Result;
use crate::models::{AddToCartRequest, Meal, NewOrder, NewPayment, Order, PaymentRecord, RemoteCart, UpdateCartRequest};
use async_trait::async_trait;

#[async_trait]
pub trait MealOrderApi: Send + Sync + std::fmt::Debug {
  /// `GET /cart/{customer_id}`. `Ok(None)` when the customer has no cart.
  async fn fetch_cart(&self, customer_id: &str) -> Result<Option<RemoteCart>>;

  /// `POST /cart/add-to-cart`
  async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<RemoteCart>;

  /// `PUT /cart/update-cart/{cart_id}`
  async fn update_cart(&self, cart_id: &str, request: &UpdateCartRequest) -> Result<RemoteCart>;

  /// `DELETE /cart/delete-cart/{cart_id}?mealId={meal_id}`.
  /// Fails with `AppError::NotFound` when the line is already gone.
  async fn delete_cart_item(&self, cart_id: &str, meal_id: &str) -> Result<()>;

  /// `GET /get-meals/get`
  async fn fetch_meals(&self) -> Result<Vec<Meal>>;

  /// `POST /payments/add-payment`
  async fn add_payment(&self, payment: &NewPayment) -> Result<PaymentRecord>;

  /// `POST /orders/add-order`
  async fn add_order(&self, order: &NewOrder) -> Result<Order>;

  /// `GET /orders/customer/{customer_id}`
  async fn fetch_orders(&self, customer_id: &str) -> Result<Vec<Order>>;
}
