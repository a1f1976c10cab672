// tests/checkout_tests.rs
mod common;

use common::*;
use mealcart::cart::{CartReconciler, CartView};
use mealcart::checkout::{CheckoutMachine, CheckoutState, Navigation};
use mealcart::errors::AppError;
use mealcart::models::{CheckoutField, CheckoutInput, PaymentMethod, PaymentStatus, Recipient, DELIVERY_FEE};
use serial_test::serial;
use std::time::Duration;

fn noodles() -> mealcart::models::Meal {
  meal("meal-noodles", "Garlic Noodles", 450, 8)
}

fn cash_input() -> CheckoutInput {
  CheckoutInput {
    delivery_address: "12 Lake Road, Colombo 5".to_string(),
    contact_phone: "0771234567".to_string(),
    payment_method: PaymentMethod::CASH_ON_DELIVERY.to_string(),
    gift: false,
    for_self: true,
  }
}

fn card_input() -> CheckoutInput {
  CheckoutInput {
    payment_method: PaymentMethod::CARD_PAYMENT.to_string(),
    gift: true,
    for_self: false,
    ..cash_input()
  }
}

/// Two noodles in a synced cart.
async fn cart_with_noodles(api: &FakeApi) -> CartView {
  api.set_cart(&[(&noodles(), 2)]);
  let (state, _cache) = app_state(api);
  let cart = CartReconciler::new(state, CUSTOMER);
  let view = cart.fetch_authoritative().await.expect("sync");
  api.clear_calls();
  view
}

fn machine(api: &FakeApi, input: CheckoutInput) -> CheckoutMachine {
  let (state, _cache) = app_state(api);
  CheckoutMachine::new(state, CUSTOMER).with_input(input)
}

#[tokio::test]
#[serial]
async fn cash_on_delivery_confirms_then_places_payment_and_order() {
  setup_tracing();
  let api = FakeApi::with_meals(vec![noodles()]);
  let view = cart_with_noodles(&api).await;
  let mut checkout = machine(&api, cash_input());

  let state = checkout.submit(&view).expect("submit").clone();
  let CheckoutState::CashConfirming(draft) = state else {
    panic!("expected confirmation prompt, got {state:?}");
  };
  assert_eq!(draft.totals.total, 900 + DELIVERY_FEE);
  assert_eq!(draft.checkout.recipient, Recipient::ForSelf);
  assert!(api.calls().is_empty(), "nothing sent before confirm");

  let state = checkout.confirm().await.expect("confirm").clone();

  let CheckoutState::Success(order) = state else {
    panic!("expected success, got {state:?}");
  };
  assert_eq!(
    api.calls(),
    vec![format!("add_payment:{}", 900 + DELIVERY_FEE), "add_order:pay-1".to_string()]
  );
  assert_eq!(order.payment_id, "pay-1");
  assert_eq!(order.items.len(), 1);
  assert_eq!(order.items[0].quantity, 2);
  assert!(!order.is_gift);
  assert_eq!(api.state.lock().payments[0].status, PaymentStatus::Pending);
  assert_eq!(checkout.redirect_after(), Some(Duration::from_millis(3000)));
}

#[tokio::test]
#[serial]
async fn cancelling_the_prompt_returns_to_entering_with_input_kept() {
  setup_tracing();
  let api = FakeApi::with_meals(vec![noodles()]);
  let view = cart_with_noodles(&api).await;
  let mut checkout = machine(&api, cash_input());

  checkout.submit(&view).expect("submit");
  let state = checkout.cancel().expect("cancel").clone();

  assert_eq!(state, CheckoutState::Entering);
  assert_eq!(checkout.input(), &cash_input());
  assert!(api.calls().is_empty());

  // The form is editable again and can be resubmitted.
  checkout.input_mut().expect("editable").contact_phone = "0712345678".to_string();
  assert!(matches!(checkout.submit(&view).expect("resubmit"), CheckoutState::CashConfirming(_)));
}

#[tokio::test]
#[serial]
async fn invalid_input_reports_every_field_and_sends_nothing() {
  setup_tracing();
  let api = FakeApi::with_meals(vec![noodles()]);
  let view = cart_with_noodles(&api).await;
  let mut checkout = machine(
    &api,
    CheckoutInput {
      delivery_address: "home".to_string(),
      contact_phone: "12345".to_string(),
      payment_method: "Bitcoin".to_string(),
      gift: false,
      for_self: false,
    },
  );

  let state = checkout.submit(&view).expect("submit").clone();

  assert_eq!(state, CheckoutState::Entering);
  let errors = checkout.field_errors();
  for field in [
    CheckoutField::DeliveryAddress,
    CheckoutField::ContactPhone,
    CheckoutField::PaymentMethod,
    CheckoutField::Recipient,
  ] {
    assert!(errors.contains(field), "missing error for {field:?}");
  }
  assert!(api.calls().is_empty());
}

#[tokio::test]
#[serial]
async fn empty_cart_cannot_be_checked_out() {
  setup_tracing();
  let api = FakeApi::default();
  let mut checkout = machine(&api, cash_input());

  checkout.submit(&CartView::default()).expect("submit");

  assert_eq!(checkout.state(), &CheckoutState::Entering);
  assert!(checkout.field_errors().contains(CheckoutField::Cart));
}

#[tokio::test]
#[serial]
async fn card_payment_hands_off_without_placing_anything() {
  setup_tracing();
  let api = FakeApi::with_meals(vec![noodles()]);
  let view = cart_with_noodles(&api).await;
  let mut checkout = machine(&api, card_input());

  let state = checkout.submit(&view).expect("submit").clone();

  let CheckoutState::CardRedirect(handoff) = state else {
    panic!("expected card redirect, got {state:?}");
  };
  assert_eq!(handoff.customer_id, CUSTOMER);
  assert_eq!(handoff.draft.checkout.recipient, Recipient::Gift);
  assert_eq!(handoff.draft.checkout.payment_method, PaymentMethod::CardPayment);
  assert_eq!(handoff.draft.totals.subtotal, 900);
  assert!(api.calls().is_empty());
  assert!(matches!(checkout.confirm().await, Err(AppError::InvalidTransition { .. })));
}

#[tokio::test]
#[serial]
async fn payment_failure_skips_order_and_allows_restart() {
  setup_tracing();
  let api = FakeApi::with_meals(vec![noodles()]);
  let view = cart_with_noodles(&api).await;
  api.fail(Endpoint::AddPayment);
  let mut checkout = machine(&api, cash_input());

  checkout.submit(&view).expect("submit");
  let state = checkout.confirm().await.expect("confirm").clone();

  assert!(matches!(state, CheckoutState::Failed(ref msg) if msg.contains("reach the server")), "got {state:?}");
  assert!(api.calls().iter().all(|c| !c.starts_with("add_order")));
  assert_eq!(checkout.redirect_after(), None);

  api.recover(Endpoint::AddPayment);
  assert_eq!(checkout.restart().expect("restart"), &CheckoutState::Entering);
  checkout.submit(&view).expect("resubmit");
  assert!(matches!(checkout.confirm().await.expect("confirm"), CheckoutState::Success(_)));
}

#[tokio::test]
#[serial]
async fn order_failure_after_payment_ends_failed() {
  setup_tracing();
  let api = FakeApi::with_meals(vec![noodles()]);
  let view = cart_with_noodles(&api).await;
  api.fail(Endpoint::AddOrder);
  let mut checkout = machine(&api, cash_input());

  checkout.submit(&view).expect("submit");
  let state = checkout.confirm().await.expect("confirm").clone();

  assert!(matches!(state, CheckoutState::Failed(_)));
  assert_eq!(api.state.lock().payments.len(), 1);
  assert!(api.state.lock().orders.is_empty());
}

#[tokio::test]
#[serial]
async fn actions_out_of_order_are_rejected() {
  setup_tracing();
  let api = FakeApi::default();
  let mut checkout = machine(&api, cash_input());

  assert!(matches!(checkout.cancel(), Err(AppError::InvalidTransition { action: "cancel", .. })));
  assert!(matches!(checkout.restart(), Err(AppError::InvalidTransition { action: "restart", .. })));
  assert!(checkout.confirm().await.is_err());
  assert!(checkout.wait_for_redirect().await.is_err());
}

#[tokio::test(start_paused = true)]
#[serial]
async fn success_redirects_to_order_history_after_delay() {
  setup_tracing();
  let api = FakeApi::with_meals(vec![noodles()]);
  let view = cart_with_noodles(&api).await;
  let mut checkout = machine(&api, cash_input());
  checkout.submit(&view).expect("submit");
  checkout.confirm().await.expect("confirm");

  let started = tokio::time::Instant::now();
  let next = checkout.wait_for_redirect().await.expect("redirect");

  assert_eq!(next, Navigation::OrderHistory);
  assert!(started.elapsed() >= Duration::from_millis(3000));
}
