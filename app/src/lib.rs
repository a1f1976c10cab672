// mealcart/src/lib.rs

//! mealcart: the customer side of a meal-ordering service.
//!
//! - [`cart`]: optimistic cart editing kept in step with the server and a local cache.
//! - [`checkout`]: validation and the checkout state machine (cash on delivery
//!   confirmation, card handoff, payment-then-order placement).
//! - [`history`] and [`receipt`]: past orders and their printed form.
//!
//! Every collaborator arrives through [`state::AppState`]; nothing is global.

pub mod cart;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod models;
pub mod pipelines;
pub mod receipt;
pub mod services;
pub mod state;

pub use errors::{AppError, Result};
