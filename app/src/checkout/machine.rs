// mealcart/src/checkout/machine.rs

use super::validation::validate_checkout;
use super::{CardHandoff, OrderDraft};
use crate::cart::CartView;
use crate::errors::{AppError, Result};
use crate::models::{CheckoutInput, FieldErrors, Order, PaymentMethod};
use crate::pipelines::{build_place_order_pipeline, PlaceOrderCtxData};
use crate::state::AppState;
use mealcart_flow::{ContextData, Pipeline, PipelineResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// ```text
/// Entering -> ValidatingInput -> CashConfirming -> Submitting -> Success
///                 |                   |                  \-> Failed
///                 |                   \-(cancel)-> Entering
///                 \-> CardRedirect (handed off, terminal here)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
  Entering,
  ValidatingInput,
  /// Cash on delivery awaits an explicit confirm or cancel.
  CashConfirming(OrderDraft),
  CardRedirect(CardHandoff),
  Submitting,
  Success(Order),
  /// Terminal for this attempt; carries the message shown to the customer.
  Failed(String),
}

impl CheckoutState {
  pub fn name(&self) -> &'static str {
    match self {
      CheckoutState::Entering => "Entering",
      CheckoutState::ValidatingInput => "ValidatingInput",
      CheckoutState::CashConfirming(_) => "CashConfirming",
      CheckoutState::CardRedirect(_) => "CardRedirect",
      CheckoutState::Submitting => "Submitting",
      CheckoutState::Success(_) => "Success",
      CheckoutState::Failed(_) => "Failed",
    }
  }
}

/// Where the caller should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
  OrderHistory,
}

pub struct CheckoutMachine {
  app_state: AppState,
  customer_id: String,
  input: CheckoutInput,
  state: CheckoutState,
  field_errors: FieldErrors,
  place_order: Arc<Pipeline<PlaceOrderCtxData, AppError>>,
  redirect_delay: Duration,
}

impl std::fmt::Debug for CheckoutMachine {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CheckoutMachine")
      .field("customer_id", &self.customer_id)
      .field("state", &self.state.name())
      .field("field_errors", &self.field_errors)
      .finish()
  }
}

impl CheckoutMachine {
  pub fn new(app_state: AppState, customer_id: impl Into<String>) -> Self {
    let redirect_delay = app_state.config.success_redirect_delay;
    Self {
      app_state,
      customer_id: customer_id.into(),
      input: CheckoutInput::default(),
      state: CheckoutState::Entering,
      field_errors: FieldErrors::new(),
      place_order: Arc::new(build_place_order_pipeline()),
      redirect_delay,
    }
  }

  pub fn with_input(mut self, input: CheckoutInput) -> Self {
    self.input = input;
    self
  }

  pub fn state(&self) -> &CheckoutState {
    &self.state
  }

  pub fn input(&self) -> &CheckoutInput {
    &self.input
  }

  /// Editable only while entering.
  pub fn input_mut(&mut self) -> Result<&mut CheckoutInput> {
    match self.state {
      CheckoutState::Entering => Ok(&mut self.input),
      _ => Err(self.invalid("edit input")),
    }
  }

  pub fn field_errors(&self) -> &FieldErrors {
    &self.field_errors
  }

  /// Validates the form against the cart.
  ///
  /// Invalid input goes back to `Entering` with field errors and sends
  /// nothing. Cash on delivery moves to `CashConfirming`; card payment moves to
  /// `CardRedirect` with the handoff payload.
  #[instrument(skip(self, cart), fields(customer_id = %self.customer_id))]
  pub fn submit(&mut self, cart: &CartView) -> Result<&CheckoutState> {
    if self.state != CheckoutState::Entering {
      return Err(self.invalid("submit"));
    }
    self.transition(CheckoutState::ValidatingInput);

    match validate_checkout(&self.input, &cart.items) {
      Err(errors) => {
        warn!(errors = %errors, "Checkout input rejected.");
        self.field_errors = errors;
        self.transition(CheckoutState::Entering);
      }
      Ok(checkout) => {
        self.field_errors = FieldErrors::new();
        let draft = OrderDraft::new(checkout, &cart.items);
        let next = match draft.checkout.payment_method {
          PaymentMethod::CashOnDelivery => CheckoutState::CashConfirming(draft),
          PaymentMethod::CardPayment => CheckoutState::CardRedirect(CardHandoff {
            customer_id: self.customer_id.clone(),
            draft,
          }),
        };
        self.transition(next);
      }
    }
    Ok(&self.state)
  }

  /// Declines the cash-on-delivery prompt. The form keeps its values.
  pub fn cancel(&mut self) -> Result<&CheckoutState> {
    if !matches!(self.state, CheckoutState::CashConfirming(_)) {
      return Err(self.invalid("cancel"));
    }
    self.transition(CheckoutState::Entering);
    Ok(&self.state)
  }

  /// Accepts the cash-on-delivery prompt and places the order: payment
  /// record, then order. Ends in `Success` or `Failed`; neither step is retried.
  #[instrument(skip(self), fields(customer_id = %self.customer_id))]
  pub async fn confirm(&mut self) -> Result<&CheckoutState> {
    let draft = match &self.state {
      CheckoutState::CashConfirming(draft) => draft.clone(),
      _ => return Err(self.invalid("confirm")),
    };
    self.transition(CheckoutState::Submitting);

    let ctx = ContextData::new(PlaceOrderCtxData {
      app_state: self.app_state.clone(),
      customer_id: self.customer_id.clone(),
      draft,
      payment: None,
      order: None,
    });

    let next = match self.place_order.run(ctx.clone()).await {
      Ok(PipelineResult::Completed) => match ctx.read().order.clone() {
        Some(order) => CheckoutState::Success(order),
        None => CheckoutState::Failed("The order could not be confirmed.".to_string()),
      },
      Ok(PipelineResult::Stopped) => CheckoutState::Failed("Order placement was halted.".to_string()),
      Err(e) => {
        error!(error = %e, "Order placement failed.");
        CheckoutState::Failed(e.user_message())
      }
    };
    self.transition(next);
    Ok(&self.state)
  }

  /// Starts a new attempt after a failure, keeping what was typed.
  pub fn restart(&mut self) -> Result<&CheckoutState> {
    if !matches!(self.state, CheckoutState::Failed(_)) {
      return Err(self.invalid("restart"));
    }
    self.transition(CheckoutState::Entering);
    Ok(&self.state)
  }

  pub fn redirect_after(&self) -> Option<Duration> {
    match self.state {
      CheckoutState::Success(_) => Some(self.redirect_delay),
      _ => None,
    }
  }

  /// Waits out the success screen, then points at order history.
  pub async fn wait_for_redirect(&self) -> Result<Navigation> {
    let delay = self.redirect_after().ok_or_else(|| self.invalid("redirect"))?;
    tokio::time::sleep(delay).await;
    Ok(Navigation::OrderHistory)
  }

  fn transition(&mut self, next: CheckoutState) {
    info!(from = self.state.name(), to = next.name(), "Checkout state changed.");
    self.state = next;
  }

  fn invalid(&self, action: &'static str) -> AppError {
    AppError::InvalidTransition {
      state: self.state.name(),
      action,
    }
  }
}
