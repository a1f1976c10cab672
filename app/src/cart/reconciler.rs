// mealcart/src/cart/reconciler.rs

//! Keeps the server cart, the local cache and the in-memory view converging.
//!
//! Mutations are optimistic: the view and cache change first, the server is
//! told afterwards. A failed server call is never rolled back locally; instead
//! an authoritative fetch is attempted, and if that fails too the last-known
//! local state stays in place. Concurrent mutations are not queued, so the
//! last one to reach the server wins.

use crate::cart::view::{merge_stock_limits, CartMutation, CartView, MutationPlan};
use crate::errors::{AppError, Result};
use crate::models::{CartLineItem, CartTotals, Meal};
use crate::pipelines::{build_cart_mutation_pipeline, CartMutationCtxData};
use crate::state::AppState;
use futures_util::future::try_join;
use mealcart_flow::{ContextData, Pipeline, PipelineResult};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
  /// Line created or its quantity changed; carries the new line.
  Updated(CartLineItem),
  Removed,
  /// Nothing to do: decrease at quantity 1, or remove of an absent meal.
  Unchanged,
}

#[derive(Clone)]
pub struct CartReconciler {
  app_state: AppState,
  customer_id: String,
  view: ContextData<CartView>,
  mutation_pipeline: Arc<Pipeline<CartMutationCtxData, AppError>>,
}

impl std::fmt::Debug for CartReconciler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CartReconciler")
      .field("customer_id", &self.customer_id)
      .field("view", &*self.view.read())
      .finish()
  }
}

impl CartReconciler {
  pub fn new(app_state: AppState, customer_id: impl Into<String>) -> Self {
    Self {
      app_state,
      customer_id: customer_id.into(),
      view: ContextData::new(CartView::default()),
      mutation_pipeline: Arc::new(build_cart_mutation_pipeline()),
    }
  }

  pub fn customer_id(&self) -> &str {
    &self.customer_id
  }

  /// Fills the view from the local cache so something can be shown before the
  /// first round-trip. Returns whether a cached cart was found.
  pub fn hydrate_from_cache(&self) -> bool {
    match self.app_state.cache.load() {
      Some(cached) => {
        info!(lines = cached.items.len(), "Cart restored from local cache.");
        let mut view = self.view.write();
        view.replace_contents(cached.cart_id, cached.items);
        true
      }
      None => false,
    }
  }

  /// Snapshot of the current view.
  pub fn view(&self) -> CartView {
    self.view.snapshot()
  }

  pub fn totals(&self) -> CartTotals {
    self.view.read().totals()
  }

  /// True while any remote mutation is awaiting the server; callers disable
  /// their cart controls meanwhile.
  pub fn is_busy(&self) -> bool {
    self.view.read().in_flight() > 0
  }

  /// Adds one unit of `meal`, creating its line on first add.
  pub async fn add(&self, meal: &Meal) -> Result<CartOutcome> {
    self.mutate(CartMutation::Add, &meal.id, Some(meal.clone())).await
  }

  /// Fails with `StockExceeded` (and sends nothing) once the line is at its
  /// stock limit.
  pub async fn increase(&self, meal_id: &str) -> Result<CartOutcome> {
    self.mutate(CartMutation::Increase, meal_id, None).await
  }

  /// No-op at quantity 1; use [`remove`](Self::remove) to drop the line.
  pub async fn decrease(&self, meal_id: &str) -> Result<CartOutcome> {
    self.mutate(CartMutation::Decrease, meal_id, None).await
  }

  /// Removes the line locally at once. A 404 from the server counts as done.
  pub async fn remove(&self, meal_id: &str) -> Result<CartOutcome> {
    self.mutate(CartMutation::Remove, meal_id, None).await
  }

  #[instrument(skip(self, meal), fields(customer_id = %self.customer_id, mutation = mutation.as_str()))]
  async fn mutate(&self, mutation: CartMutation, meal_id: &str, meal: Option<Meal>) -> Result<CartOutcome> {
    let ctx = ContextData::new(CartMutationCtxData::new(
      self.app_state.clone(),
      self.customer_id.clone(),
      self.view.clone(),
      mutation,
      meal_id.to_string(),
      meal,
    ));

    match self.mutation_pipeline.run(ctx.clone()).await {
      Ok(PipelineResult::Stopped) => Ok(CartOutcome::Unchanged),
      Ok(PipelineResult::Completed) => {
        let plan = ctx.read().plan.clone();
        Ok(match plan {
          MutationPlan::Insert(line) | MutationPlan::SetQuantity(line) => CartOutcome::Updated(line),
          MutationPlan::Delete(_) => CartOutcome::Removed,
          MutationPlan::Nothing => CartOutcome::Unchanged,
        })
      }
      Err(e) => {
        let remote_attempted = ctx.read().remote_attempted;
        if remote_attempted && e.is_remote() {
          warn!(error = %e, "Server rejected cart change; resyncing from server.");
          if let Err(resync_err) = self.fetch_authoritative().await {
            warn!(error = %resync_err, "Resync failed; keeping last-known local cart.");
          }
        }
        Err(e)
      }
    }
  }

  /// Reads the server cart and the meal catalog, merges stock limits into the
  /// lines, and overwrites both the view and the cache with the result.
  ///
  /// On failure nothing local is touched.
  #[instrument(skip(self), fields(customer_id = %self.customer_id))]
  pub async fn fetch_authoritative(&self) -> Result<CartView> {
    let api = self.app_state.api.clone();
    let (remote, meals) = try_join(api.fetch_cart(&self.customer_id), api.fetch_meals()).await?;

    let items = merge_stock_limits(remote.as_ref(), &meals);
    let cart_id = remote.map(|cart| cart.id);

    let snapshot = {
      let mut view = self.view.write();
      view.replace_contents(cart_id, items);
      view.clone()
    };
    if let Err(e) = self.app_state.cache.store(&snapshot.to_cached()) {
      warn!(error = %e, "Cart cache not refreshed after authoritative fetch.");
    }
    info!(lines = snapshot.items.len(), cart_id = ?snapshot.cart_id, "Cart synced from server.");
    Ok(snapshot)
  }
}
