// mealcart/src/pipelines/cart_pipeline.rs

use crate::cart::view::InFlightGuard;
use crate::cart::MutationPlan;
use crate::errors::{AppError, Result as AppResult};
use crate::models::{AddToCartRequest, CartLineItem, RemoteCart, UpdateCartRequest};
use crate::pipelines::contexts::CartMutationCtxData;
use mealcart_flow::{ContextData, Pipeline, PipelineControl};
use tracing::{debug, info, instrument, warn};

/// One pipeline serves add, increase, decrease and remove; the context says which.
pub fn build_cart_mutation_pipeline() -> Pipeline<CartMutationCtxData, AppError> {
  let mut p = Pipeline::<CartMutationCtxData, AppError>::new(&[
    ("check_preconditions", false, None),
    ("apply_local", false, None),
    ("mirror_cache", false, None),
    ("sync_remote", false, None),
  ]);

  p.on_root("check_preconditions", check_preconditions);
  p.on_root("apply_local", apply_local);
  p.on_root("mirror_cache", mirror_cache);
  p.on_root("sync_remote", sync_remote);

  debug!("Cart mutation pipeline built.");
  p
}

/// Stock and presence checks against the current view. No network.
async fn check_preconditions(ctx: ContextData<CartMutationCtxData>) -> AppResult<PipelineControl> {
  let (mutation, meal_id, planned) = {
    let guard = ctx.read();
    let view = guard.view.read();
    (
      guard.mutation,
      guard.meal_id.clone(),
      view.plan(guard.mutation, &guard.meal_id, guard.meal.as_ref()),
    )
  };

  match planned {
    Ok(MutationPlan::Nothing) => {
      info!(mutation = mutation.as_str(), %meal_id, "Cart mutation is a no-op.");
      Ok(PipelineControl::Stop)
    }
    Ok(plan) => {
      ctx.write().plan = plan;
      Ok(PipelineControl::Continue)
    }
    Err(e) => {
      warn!(mutation = mutation.as_str(), %meal_id, error = %e, "Cart mutation rejected locally.");
      Err(e)
    }
  }
}

/// Optimistic update. The plan is worked out again under the write lock so a
/// concurrent mutation cannot push a line past its stock limit or below 1.
async fn apply_local(ctx: ContextData<CartMutationCtxData>) -> AppResult<PipelineControl> {
  let (view, mutation, meal_id, meal) = {
    let guard = ctx.read();
    (guard.view.clone(), guard.mutation, guard.meal_id.clone(), guard.meal.clone())
  };

  let (plan, cart_id) = {
    let mut view_guard = view.write();
    let cart_id = view_guard.cart_id.clone();
    let plan = view_guard.plan(mutation, &meal_id, meal.as_ref())?;
    view_guard.commit(&plan);
    (plan, cart_id)
  };

  if plan == MutationPlan::Nothing {
    return Ok(PipelineControl::Stop);
  }

  debug!(mutation = mutation.as_str(), %meal_id, ?plan, "Applied cart change locally.");
  let mut guard = ctx.write();
  guard.plan = plan;
  guard.cart_id_at_apply = cart_id;
  Ok(PipelineControl::Continue)
}

/// Writes the view to the local cache. A failed write is logged, not fatal.
async fn mirror_cache(ctx: ContextData<CartMutationCtxData>) -> AppResult<PipelineControl> {
  let (cache, cached) = {
    let guard = ctx.read();
    let cached = guard.view.read().to_cached();
    (guard.app_state.cache.clone(), cached)
  };
  if let Err(e) = cache.store(&cached) {
    warn!(error = %e, "Cart cache not updated.");
  }
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart::sync_remote", skip_all)]
async fn sync_remote(ctx: ContextData<CartMutationCtxData>) -> AppResult<PipelineControl> {
  let (app_state, customer_id, view, plan, cart_id) = {
    let mut guard = ctx.write();
    guard.remote_attempted = true;
    (
      guard.app_state.clone(),
      guard.customer_id.clone(),
      guard.view.clone(),
      guard.plan.clone(),
      guard.cart_id_at_apply.clone(),
    )
  };
  let _in_flight = InFlightGuard::begin(&view);
  let api = app_state.api.clone();

  match plan {
    MutationPlan::Delete(line) => {
      let Some(cart_id) = cart_id else {
        debug!(meal_id = %line.meal_id, "Cart never reached the server; nothing to delete.");
        return Ok(PipelineControl::Continue);
      };
      match api.delete_cart_item(&cart_id, &line.meal_id).await {
        Ok(()) => info!(%cart_id, meal_id = %line.meal_id, "Cart line deleted on server."),
        Err(e) if e.is_not_found() => {
          info!(%cart_id, meal_id = %line.meal_id, "Cart line already absent on server.");
        }
        Err(e) => return Err(e),
      }
    }
    MutationPlan::Insert(line) => {
      let remote = api.add_to_cart(&add_request(&customer_id, &line)).await?;
      adopt_cart_id(&ctx, &remote);
    }
    MutationPlan::SetQuantity(line) => {
      let remote = match cart_id {
        Some(cart_id) => api.update_cart(&cart_id, &UpdateCartRequest::from(&line)).await?,
        // Only known locally (e.g. restored from cache): create it server-side.
        None => api.add_to_cart(&add_request(&customer_id, &line)).await?,
      };
      adopt_cart_id(&ctx, &remote);
    }
    MutationPlan::Nothing => {}
  }
  Ok(PipelineControl::Continue)
}

fn add_request(customer_id: &str, line: &CartLineItem) -> AddToCartRequest {
  AddToCartRequest {
    customer_id: customer_id.to_string(),
    meal_id: line.meal_id.clone(),
    meal_name: line.meal_name.clone(),
    price: line.unit_price,
    quantity: line.quantity,
  }
}

/// Records the server's cart id once the view has lines but no id yet.
fn adopt_cart_id(ctx: &ContextData<CartMutationCtxData>, remote: &RemoteCart) {
  let (view, cache) = {
    let guard = ctx.read();
    (guard.view.clone(), guard.app_state.cache.clone())
  };
  let cached = {
    let mut view_guard = view.write();
    if view_guard.cart_id.is_some() || view_guard.is_empty() {
      return;
    }
    view_guard.cart_id = Some(remote.id.clone());
    view_guard.to_cached()
  };
  info!(cart_id = %remote.id, "Adopted server cart id.");
  if let Err(e) = cache.store(&cached) {
    warn!(error = %e, "Cart cache not updated with new cart id.");
  }
}
