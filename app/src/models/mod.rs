// mealcart/src/models/mod.rs

//! Wire and view types for meals, carts, checkout input, payments and orders.

pub mod cart_item;
pub mod checkout;
pub mod meal;
pub mod order;
pub mod payment;

pub use cart_item::{AddToCartRequest, CartLineItem, CartTotals, RemoteCart, RemoteCartItem, UpdateCartRequest, DELIVERY_FEE};
pub use checkout::{CheckoutField, CheckoutInput, FieldErrors, PaymentMethod, Recipient, UnknownPaymentMethod, ValidatedCheckout};
pub use meal::Meal;
pub use order::{NewOrder, Order, OrderLine, OrderStatus};
pub use payment::{NewPayment, PaymentRecord, PaymentStatus};
