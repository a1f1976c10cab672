// mealcart/src/errors.rs

use crate::models::FieldErrors;
use mealcart_flow::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// Checkout input failed local validation. No request was sent.
  #[error("Validation Error: {0}")]
  Validation(FieldErrors),

  /// Local precondition for `increase`/`add`. No request was sent.
  #[error("Stock limit reached for '{meal_name}': only {limit} available")]
  StockExceeded { meal_name: String, limit: u32 },

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// The request never produced an HTTP response (connect, timeout, body decode).
  #[error("Network Error: {0}")]
  Network(String),

  #[error("API Error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Cart Cache Error: {0}")]
  Cache(String),

  #[error("Checkout cannot {action} while in state {state}")]
  InvalidTransition { state: &'static str, action: &'static str },

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl AppError {
  /// True for failures of a remote call, the kind that triggers a resync.
  pub fn is_remote(&self) -> bool {
    matches!(self, AppError::Network(_) | AppError::Api { .. } | AppError::NotFound(_))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, AppError::NotFound(_))
  }

  /// Short text for a dismissible message.
  pub fn user_message(&self) -> String {
    match self {
      AppError::Validation(errors) => format!("Please fix the highlighted fields: {}", errors),
      AppError::StockExceeded { meal_name, limit } => {
        format!("Sorry, only {} of {} available.", limit, meal_name)
      }
      AppError::NotFound(what) => format!("{} could not be found.", what),
      AppError::Network(_) => "Could not reach the server. Please check your connection.".to_string(),
      AppError::Api { .. } => "The server could not complete the request. Please try again.".to_string(),
      AppError::InvalidTransition { .. } => "That action is not available right now.".to_string(),
      AppError::Config(_) | AppError::Cache(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        "Something went wrong. Please try again.".to_string()
      }
    }
  }
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    if let Some(status) = err.status() {
      if status == reqwest::StatusCode::NOT_FOUND {
        return AppError::NotFound(err.url().map_or_else(|| "resource".to_string(), |u| u.path().to_string()));
      }
      return AppError::Api {
        status: status.as_u16(),
        message: err.to_string(),
      };
    }
    AppError::Network(err.to_string())
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<AppError>() {
      Ok(app_err) => app_err,
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
