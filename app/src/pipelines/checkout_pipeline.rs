// mealcart/src/pipelines/checkout_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewOrder, NewPayment, PaymentMethod, PaymentStatus, Recipient};
use crate::pipelines::contexts::PlaceOrderCtxData;
use chrono::Utc;
use mealcart_flow::{ContextData, Pipeline, PipelineControl};
use tracing::{error, info, instrument};

/// Payment record first, then the order that references it. No retries: a
/// failure at either step ends the run with that error.
pub fn build_place_order_pipeline() -> Pipeline<PlaceOrderCtxData, AppError> {
  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    ("create_payment", false, None),
    ("create_order", false, None),
  ]);

  p.on_root("create_payment", create_payment);
  p.on_root("create_order", create_order);

  p
}

#[instrument(name = "checkout::create_payment", skip_all)]
async fn create_payment(ctx: ContextData<PlaceOrderCtxData>) -> AppResult<PipelineControl> {
  let (api, new_payment) = {
    let guard = ctx.read();
    let method = guard.draft.checkout.payment_method;
    let new_payment = NewPayment {
      customer_id: guard.customer_id.clone(),
      amount: guard.draft.totals.total,
      payment_method: method,
      status: match method {
        PaymentMethod::CashOnDelivery => PaymentStatus::Pending,
        PaymentMethod::CardPayment => PaymentStatus::Paid,
      },
      created_at: Utc::now(),
    };
    (guard.app_state.api.clone(), new_payment)
  };

  info!(amount = new_payment.amount, method = %new_payment.payment_method, "Creating payment record.");
  let payment = api.add_payment(&new_payment).await?;
  info!(payment_id = %payment.id, "Payment record created.");

  ctx.write().payment = Some(payment);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::create_order", skip_all)]
async fn create_order(ctx: ContextData<PlaceOrderCtxData>) -> AppResult<PipelineControl> {
  let (api, new_order) = {
    let guard = ctx.read();
    let Some(payment) = guard.payment.as_ref() else {
      error!("Order step reached without a payment record.");
      return Err(AppError::Internal("payment record missing before order creation".to_string()));
    };
    let draft = &guard.draft;
    let new_order = NewOrder {
      customer_id: guard.customer_id.clone(),
      payment_id: payment.id.clone(),
      payment_method: draft.checkout.payment_method,
      items: draft.lines.clone(),
      delivery_address: draft.checkout.delivery_address.clone(),
      contact_phone: draft.checkout.contact_phone.clone(),
      is_gift: draft.checkout.recipient == Recipient::Gift,
      totals: draft.totals,
      created_at: Utc::now(),
    };
    (guard.app_state.api.clone(), new_order)
  };

  let order = api.add_order(&new_order).await?;
  info!(order_id = %order.id, payment_id = %new_order.payment_id, total = order.totals.total, "Order created.");

  ctx.write().order = Some(order);
  Ok(PipelineControl::Continue)
}
