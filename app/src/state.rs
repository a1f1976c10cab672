// mealcart/src/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{CartCache, FileCartCache, HttpMealOrderApi, MealOrderApi, MemoryCartCache};
use std::sync::Arc;

/// Everything the cart and checkout flows depend on, passed in explicitly.
#[derive(Debug, Clone)]
pub struct AppState {
  pub api: Arc<dyn MealOrderApi>,
  pub cache: Arc<dyn CartCache>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(config: AppConfig, api: Arc<dyn MealOrderApi>, cache: Arc<dyn CartCache>) -> Self {
    Self {
      api,
      cache,
      config: Arc::new(config),
    }
  }

  /// Wires the HTTP client and the cache the configuration asks for.
  pub fn from_config(config: AppConfig) -> Result<Self> {
    let api: Arc<dyn MealOrderApi> = Arc::new(HttpMealOrderApi::new(&config.api_base_url, config.request_timeout)?);
    let cache: Arc<dyn CartCache> = match &config.cart_cache_path {
      Some(path) => Arc::new(FileCartCache::new(path)),
      None => {
        tracing::info!("CART_CACHE_PATH not set; cart cache kept in memory.");
        Arc::new(MemoryCartCache::new())
      }
    };
    Ok(Self::new(config, api, cache))
  }
}
