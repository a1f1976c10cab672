// mealcart/src/pipelines/mod.rs

//! Step pipelines behind the cart mutations and order placement.

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod contexts;

pub use cart_pipeline::build_cart_mutation_pipeline;
pub use checkout_pipeline::build_place_order_pipeline;
pub use contexts::{CartMutationCtxData, PlaceOrderCtxData};
