// mealcart/src/services/mod.rs

//! External collaborators: the REST API and the local cart cache.

pub mod api;
pub mod cache;
pub mod http_api;

pub use api::MealOrderApi;
pub use cache::{CachedCart, CartCache, FileCartCache, MemoryCartCache};
pub use http_api::HttpMealOrderApi;
