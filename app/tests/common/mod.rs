// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use mealcart::config::AppConfig;
use mealcart::errors::{AppError, Result};
use mealcart::models::{
  AddToCartRequest, CartLineItem, Meal, NewOrder, NewPayment, Order, OrderStatus, PaymentRecord, RemoteCart,
  RemoteCartItem, UpdateCartRequest,
};
use mealcart::services::{CachedCart, CartCache, MealOrderApi, MemoryCartCache};
use mealcart::state::AppState;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

pub const CUSTOMER: &str = "cust-1";
pub const SERVER_CART_ID: &str = "cart-srv-1";

/// Which fake endpoint should fail, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
  FetchCart,
  AddToCart,
  UpdateCart,
  DeleteCartItem,
  FetchMeals,
  AddPayment,
  AddOrder,
  FetchOrders,
}

#[derive(Debug, Default)]
pub struct FakeState {
  pub meals: Vec<Meal>,
  pub cart: Option<RemoteCart>,
  pub orders: Vec<Order>,
  pub payments: Vec<NewPayment>,
  /// Every call in arrival order, e.g. `update_cart:cart-srv-1:meal-1=3`.
  pub calls: Vec<String>,
  pub failing: HashSet<Endpoint>,
  /// Answer deletes with 404 regardless of the stored cart.
  pub delete_not_found: bool,
  /// Optional hold on `update_cart` so tests can observe in-flight state.
  pub update_gate: Option<Arc<tokio::sync::Notify>>,
}

/// In-memory stand-in for the REST API. Records every call.
#[derive(Debug, Default, Clone)]
pub struct FakeApi {
  pub state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
  pub fn with_meals(meals: Vec<Meal>) -> Self {
    let api = Self::default();
    api.state.lock().meals = meals;
    api
  }

  pub fn set_cart(&self, items: &[(&Meal, u32)]) {
    self.state.lock().cart = Some(RemoteCart {
      id: SERVER_CART_ID.to_string(),
      customer_id: CUSTOMER.to_string(),
      items: items
        .iter()
        .map(|(meal, quantity)| RemoteCartItem {
          meal_id: meal.id.clone(),
          meal_name: meal.name.clone(),
          price: meal.price,
          quantity: *quantity,
        })
        .collect(),
    });
  }

  pub fn fail(&self, endpoint: Endpoint) {
    self.state.lock().failing.insert(endpoint);
  }

  pub fn recover(&self, endpoint: Endpoint) {
    self.state.lock().failing.remove(&endpoint);
  }

  pub fn calls(&self) -> Vec<String> {
    self.state.lock().calls.clone()
  }

  /// Calls other than the reads the reconciler makes while syncing.
  pub fn writes(&self) -> Vec<String> {
    self
      .calls()
      .into_iter()
      .filter(|c| !c.starts_with("fetch_"))
      .collect()
  }

  pub fn clear_calls(&self) {
    self.state.lock().calls.clear();
  }

  fn enter(&self, endpoint: Endpoint, call: String) -> Result<()> {
    let mut state = self.state.lock();
    state.calls.push(call);
    if state.failing.contains(&endpoint) {
      return Err(AppError::Network(format!("{:?} unreachable", endpoint)));
    }
    Ok(())
  }

  fn cart_or_new<'a>(state: &'a mut FakeState, customer_id: &str) -> &'a mut RemoteCart {
    state.cart.get_or_insert_with(|| RemoteCart {
      id: SERVER_CART_ID.to_string(),
      customer_id: customer_id.to_string(),
      items: Vec::new(),
    })
  }
}

#[async_trait]
impl MealOrderApi for FakeApi {
  async fn fetch_cart(&self, customer_id: &str) -> Result<Option<RemoteCart>> {
    self.enter(Endpoint::FetchCart, format!("fetch_cart:{}", customer_id))?;
    Ok(self.state.lock().cart.clone())
  }

  async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<RemoteCart> {
    self.enter(
      Endpoint::AddToCart,
      format!("add_to_cart:{}={}", request.meal_id, request.quantity),
    )?;
    let mut state = self.state.lock();
    let cart = Self::cart_or_new(&mut state, &request.customer_id);
    match cart.items.iter_mut().find(|i| i.meal_id == request.meal_id) {
      Some(item) => item.quantity = request.quantity,
      None => cart.items.push(RemoteCartItem {
        meal_id: request.meal_id.clone(),
        meal_name: request.meal_name.clone(),
        price: request.price,
        quantity: request.quantity,
      }),
    }
    Ok(cart.clone())
  }

  async fn update_cart(&self, cart_id: &str, request: &UpdateCartRequest) -> Result<RemoteCart> {
    self.enter(
      Endpoint::UpdateCart,
      format!("update_cart:{}:{}={}", cart_id, request.meal_id, request.quantity),
    )?;
    let gate = self.state.lock().update_gate.clone();
    if let Some(gate) = gate {
      gate.notified().await;
    }
    let mut state = self.state.lock();
    let cart = state
      .cart
      .as_mut()
      .filter(|cart| cart.id == cart_id)
      .ok_or_else(|| AppError::NotFound(format!("Cart {}", cart_id)))?;
    if let Some(item) = cart.items.iter_mut().find(|i| i.meal_id == request.meal_id) {
      item.quantity = request.quantity;
    }
    Ok(cart.clone())
  }

  async fn delete_cart_item(&self, cart_id: &str, meal_id: &str) -> Result<()> {
    self.enter(Endpoint::DeleteCartItem, format!("delete_cart_item:{}:{}", cart_id, meal_id))?;
    let mut state = self.state.lock();
    if state.delete_not_found {
      return Err(AppError::NotFound(format!("Cart item {}", meal_id)));
    }
    let cart = state
      .cart
      .as_mut()
      .ok_or_else(|| AppError::NotFound(format!("Cart {}", cart_id)))?;
    let before = cart.items.len();
    cart.items.retain(|i| i.meal_id != meal_id);
    if cart.items.len() == before {
      return Err(AppError::NotFound(format!("Cart item {}", meal_id)));
    }
    if cart.items.is_empty() {
      state.cart = None;
    }
    Ok(())
  }

  async fn fetch_meals(&self) -> Result<Vec<Meal>> {
    self.enter(Endpoint::FetchMeals, "fetch_meals".to_string())?;
    Ok(self.state.lock().meals.clone())
  }

  async fn add_payment(&self, payment: &NewPayment) -> Result<PaymentRecord> {
    self.enter(Endpoint::AddPayment, format!("add_payment:{}", payment.amount))?;
    let mut state = self.state.lock();
    state.payments.push(payment.clone());
    Ok(PaymentRecord {
      id: format!("pay-{}", state.payments.len()),
      customer_id: payment.customer_id.clone(),
      amount: payment.amount,
      payment_method: payment.payment_method,
      status: payment.status,
      created_at: Some(payment.created_at),
    })
  }

  async fn add_order(&self, order: &NewOrder) -> Result<Order> {
    self.enter(Endpoint::AddOrder, format!("add_order:{}", order.payment_id))?;
    let mut state = self.state.lock();
    let placed = Order {
      id: format!("order-{}", state.orders.len() + 1),
      customer_id: order.customer_id.clone(),
      payment_id: order.payment_id.clone(),
      payment_method: order.payment_method,
      items: order.items.clone(),
      delivery_address: order.delivery_address.clone(),
      contact_phone: order.contact_phone.clone(),
      is_gift: order.is_gift,
      totals: order.totals,
      status: OrderStatus::Pending,
      created_at: order.created_at,
    };
    state.orders.push(placed.clone());
    state.cart = None;
    Ok(placed)
  }

  async fn fetch_orders(&self, customer_id: &str) -> Result<Vec<Order>> {
    self.enter(Endpoint::FetchOrders, format!("fetch_orders:{}", customer_id))?;
    Ok(self.state.lock().orders.clone())
  }
}

pub fn meal(id: &str, name: &str, price: u32, stock: u32) -> Meal {
  Meal {
    id: id.to_string(),
    name: name.to_string(),
    price,
    stock,
    description: None,
  }
}

pub fn line(meal: &Meal, quantity: u32) -> CartLineItem {
  CartLineItem {
    meal_id: meal.id.clone(),
    meal_name: meal.name.clone(),
    unit_price: meal.price,
    quantity,
    stock_limit: meal.stock,
  }
}

pub fn test_config() -> AppConfig {
  AppConfig {
    api_base_url: "http://api.test".to_string(),
    customer_id: Some(CUSTOMER.to_string()),
    cart_cache_path: None,
    request_timeout: Duration::from_secs(1),
    success_redirect_delay: Duration::from_millis(3000),
  }
}

/// State wired to `api` and a fresh in-memory cache; the cache is returned too.
pub fn app_state(api: &FakeApi) -> (AppState, Arc<MemoryCartCache>) {
  app_state_with_cache(api, None)
}

pub fn app_state_with_cache(api: &FakeApi, cached: Option<CachedCart>) -> (AppState, Arc<MemoryCartCache>) {
  let cache = Arc::new(match cached {
    Some(cart) => MemoryCartCache::with_cart(cart),
    None => MemoryCartCache::new(),
  });
  let state = AppState::new(
    test_config(),
    Arc::new(api.clone()) as Arc<dyn MealOrderApi>,
    cache.clone() as Arc<dyn CartCache>,
  );
  (state, cache)
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
