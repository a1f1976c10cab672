// mealcart/src/checkout/validation.rs

//! Local checks that gate checkout submission. Nothing here touches the network.

use crate::models::{CartLineItem, CheckoutField, CheckoutInput, FieldErrors, PaymentMethod, Recipient, ValidatedCheckout};

pub const MIN_ADDRESS_LEN: usize = 10;
pub const PHONE_DIGITS: usize = 10;

/// An address must be at least ten characters and mix letters with digits
/// (a house number and a street name, roughly). Surrounding whitespace is not
/// counted, and the validated address is stored trimmed.
pub fn is_plausible_address(address: &str) -> bool {
  let address = address.trim();
  address.chars().count() >= MIN_ADDRESS_LEN
    && address.chars().any(char::is_alphabetic)
    && address.chars().any(|c| c.is_ascii_digit())
}

/// Exactly ten ASCII digits, not all zero. Whitespace anywhere is rejected.
pub fn is_valid_phone(phone: &str) -> bool {
  phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit()) && phone.bytes().any(|b| b != b'0')
}

/// Validates every field and reports all failures at once.
pub fn validate_checkout(input: &CheckoutInput, items: &[CartLineItem]) -> Result<ValidatedCheckout, FieldErrors> {
  let mut errors = FieldErrors::new();

  if items.is_empty() {
    errors.insert(CheckoutField::Cart, "Your cart is empty.");
  }

  let recipient = match (input.gift, input.for_self) {
    (true, false) => Some(Recipient::Gift),
    (false, true) => Some(Recipient::ForSelf),
    (true, true) => {
      errors.insert(CheckoutField::Recipient, "Choose either gift or self, not both.");
      None
    }
    (false, false) => {
      errors.insert(CheckoutField::Recipient, "Choose whether this order is a gift or for yourself.");
      None
    }
  };

  if !is_plausible_address(&input.delivery_address) {
    errors.insert(
      CheckoutField::DeliveryAddress,
      "Enter a full address (at least 10 characters with letters and numbers).",
    );
  }

  if !is_valid_phone(&input.contact_phone) {
    errors.insert(CheckoutField::ContactPhone, "Enter a valid 10-digit phone number.");
  }

  let payment_method = match input.payment_method.parse::<PaymentMethod>() {
    Ok(method) => Some(method),
    Err(e) => {
      errors.insert(CheckoutField::PaymentMethod, format!("Select a payment method ({}).", e));
      None
    }
  };

  match (recipient, payment_method) {
    (Some(recipient), Some(payment_method)) if errors.is_empty() => Ok(ValidatedCheckout {
      delivery_address: input.delivery_address.trim().to_string(),
      contact_phone: input.contact_phone.clone(),
      payment_method,
      recipient,
    }),
    _ => Err(errors),
  }
}
