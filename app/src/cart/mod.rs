// mealcart/src/cart/mod.rs

//! Client-side cart: the in-memory view model and its reconciliation with the
//! server record and the local cache.

pub mod reconciler;
pub mod view;

pub use reconciler::{CartOutcome, CartReconciler};
pub use view::{merge_stock_limits, CartMutation, CartView, MutationPlan};
