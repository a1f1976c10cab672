// mealcart/src/pipelines/contexts.rs

//! Data carried through each pipeline run, wrapped in `ContextData` by the caller.

use crate::cart::{CartMutation, CartView, MutationPlan};
use crate::checkout::OrderDraft;
use crate::models::{Meal, Order, PaymentRecord};
use crate::state::AppState;
use mealcart_flow::ContextData;

#[derive(Clone)]
pub struct CartMutationCtxData {
  pub app_state: AppState,
  pub customer_id: String,
  /// Shared with the reconciler; every run edits the same view.
  pub view: ContextData<CartView>,
  pub mutation: CartMutation,
  pub meal_id: String,
  /// Catalog entry, needed for the first `Add` of a meal.
  pub meal: Option<Meal>,
  pub plan: MutationPlan,
  /// Cart id seen when the change was applied locally. Removing the last line
  /// clears the view's id, but the delete still has to target this one.
  pub cart_id_at_apply: Option<String>,
  pub remote_attempted: bool,
}

impl CartMutationCtxData {
  pub fn new(
    app_state: AppState,
    customer_id: String,
    view: ContextData<CartView>,
    mutation: CartMutation,
    meal_id: String,
    meal: Option<Meal>,
  ) -> Self {
    Self {
      app_state,
      customer_id,
      view,
      mutation,
      meal_id,
      meal,
      plan: MutationPlan::Nothing,
      cart_id_at_apply: None,
      remote_attempted: false,
    }
  }
}

#[derive(Clone)]
pub struct PlaceOrderCtxData {
  pub app_state: AppState,
  pub customer_id: String,
  pub draft: OrderDraft,
  pub payment: Option<PaymentRecord>,
  pub order: Option<Order>,
}
