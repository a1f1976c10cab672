// mealcart/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SUCCESS_REDIRECT_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Root of the meal-ordering REST API, without a trailing slash.
  pub api_base_url: String,
  pub customer_id: Option<String>,
  /// Where the last-known cart is mirrored. `None` keeps it in memory only.
  pub cart_cache_path: Option<PathBuf>,
  pub request_timeout: Duration,
  /// How long the success screen stays up before moving to order history.
  pub success_redirect_delay: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. `from_env` passes the process
  /// environment; tests pass a map.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let api_base_url = non_empty("API_BASE_URL")
      .ok_or_else(|| AppError::Config("Missing environment variable 'API_BASE_URL'".to_string()))?
      .trim_end_matches('/')
      .to_string();
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
      return Err(AppError::Config(format!(
        "API_BASE_URL must start with http:// or https://, got '{}'",
        api_base_url
      )));
    }

    let customer_id = non_empty("CUSTOMER_ID");
    let cart_cache_path = non_empty("CART_CACHE_PATH").map(PathBuf::from);

    let request_timeout = match non_empty("REQUEST_TIMEOUT_SECS") {
      Some(raw) => Duration::from_secs(
        raw
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid REQUEST_TIMEOUT_SECS '{}': {}", raw, e)))?,
      ),
      None => DEFAULT_REQUEST_TIMEOUT,
    };

    let success_redirect_delay = match non_empty("SUCCESS_REDIRECT_DELAY_MS") {
      Some(raw) => Duration::from_millis(
        raw
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid SUCCESS_REDIRECT_DELAY_MS '{}': {}", raw, e)))?,
      ),
      None => DEFAULT_SUCCESS_REDIRECT_DELAY,
    };

    tracing::info!(api_base_url = %api_base_url, "Application configuration loaded.");

    Ok(Self {
      api_base_url,
      customer_id,
      cart_cache_path,
      request_timeout,
      success_redirect_delay,
    })
  }
}
