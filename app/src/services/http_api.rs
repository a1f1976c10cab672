// mealcart/src/services/http_api.rs

use crate::errors::{AppError, Result};
use crate::models::{AddToCartRequest, Meal, NewOrder, NewPayment, Order, PaymentRecord, RemoteCart, UpdateCartRequest};
use crate::services::api::MealOrderApi;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// `MealOrderApi` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpMealOrderApi {
  base_url: String,
  http: Client,
}

impl HttpMealOrderApi {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
    let http = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      http,
    })
  }

  pub(crate) fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  async fn send(&self, request: RequestBuilder, what: &str) -> Result<reqwest::Response> {
    let response = request.send().await.map_err(|e| AppError::Network(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
      debug!(%status, what, "Resource not found.");
      return Err(AppError::NotFound(what.to_string()));
    }
    let message = response.text().await.unwrap_or_default();
    warn!(%status, what, body = %message, "Request rejected by server.");
    Err(AppError::Api {
      status: status.as_u16(),
      message,
    })
  }

  async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
    let response = self.send(request, what).await?;
    response
      .json::<T>()
      .await
      .map_err(|e| AppError::Network(format!("Malformed {} response: {}", what, e)))
  }
}

#[async_trait]
impl MealOrderApi for HttpMealOrderApi {
  #[instrument(skip(self))]
  async fn fetch_cart(&self, customer_id: &str) -> Result<Option<RemoteCart>> {
    let request = self.http.get(self.url(&format!("cart/{}", customer_id)));
    match self.send_json::<RemoteCart>(request, "cart").await {
      Ok(cart) => Ok(Some(cart)),
      Err(AppError::NotFound(_)) => Ok(None),
      Err(e) => Err(e),
    }
  }

  #[instrument(skip(self, request), fields(meal_id = %request.meal_id, quantity = request.quantity))]
  async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<RemoteCart> {
    let req = self.http.post(self.url("cart/add-to-cart")).json(request);
    self.send_json(req, "cart").await
  }

  #[instrument(skip(self, request), fields(meal_id = %request.meal_id, quantity = request.quantity))]
  async fn update_cart(&self, cart_id: &str, request: &UpdateCartRequest) -> Result<RemoteCart> {
    let req = self.http.put(self.url(&format!("cart/update-cart/{}", cart_id))).json(request);
    self.send_json(req, "cart").await
  }

  #[instrument(skip(self))]
  async fn delete_cart_item(&self, cart_id: &str, meal_id: &str) -> Result<()> {
    let req = self
      .http
      .delete(self.url(&format!("cart/delete-cart/{}", cart_id)))
      .query(&[("mealId", meal_id)]);
    self.send(req, "cart item").await.map(|_| ())
  }

  #[instrument(skip(self))]
  async fn fetch_meals(&self) -> Result<Vec<Meal>> {
    self.send_json(self.http.get(self.url("get-meals/get")), "meal catalog").await
  }

  #[instrument(skip(self, payment), fields(amount = payment.amount, method = %payment.payment_method))]
  async fn add_payment(&self, payment: &NewPayment) -> Result<PaymentRecord> {
    let req = self.http.post(self.url("payments/add-payment")).json(payment);
    self.send_json(req, "payment").await
  }

  #[instrument(skip(self, order), fields(payment_id = %order.payment_id, lines = order.items.len()))]
  async fn add_order(&self, order: &NewOrder) -> Result<Order> {
    let req = self.http.post(self.url("orders/add-order")).json(order);
    self.send_json(req, "order").await
  }

  #[instrument(skip(self))]
  async fn fetch_orders(&self, customer_id: &str) -> Result<Vec<Order>> {
    let req = self.http.get(self.url(&format!("orders/customer/{}", customer_id)));
    match self.send_json(req, "orders").await {
      Err(AppError::NotFound(_)) => Ok(Vec::new()),
      other => other,
    }
  }
}
