// mealcart/src/services/cache.rs

//! Local persistent mirror of the cart.
//!
//! The cache is a fallback render source only. It is rewritten after every
//! local mutation and overwritten by every authoritative fetch; it is never
//! merged with server state.

use crate::errors::{AppError, Result};
use crate::models::CartLineItem;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCart {
  pub cart_id: Option<String>,
  pub items: Vec<CartLineItem>,
}

pub trait CartCache: Send + Sync + std::fmt::Debug {
  /// Last stored cart, or `None` if nothing usable is stored.
  fn load(&self) -> Option<CachedCart>;
  fn store(&self, cart: &CachedCart) -> Result<()>;
  fn clear(&self) -> Result<()>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileCartCache {
  path: PathBuf,
}

impl FileCartCache {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl CartCache for FileCartCache {
  fn load(&self) -> Option<CachedCart> {
    let raw = match fs::read(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "Could not read cart cache.");
        return None;
      }
    };
    match serde_json::from_slice::<CachedCart>(&raw) {
      Ok(mut cart) => {
        // A hand-edited or stale file must not smuggle in empty lines.
        cart.items.retain(|item| item.quantity >= 1);
        Some(cart)
      }
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "Ignoring corrupt cart cache.");
        None
      }
    }
  }

  fn store(&self, cart: &CachedCart) -> Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(|e| AppError::Cache(format!("{}: {}", parent.display(), e)))?;
    }
    let body = serde_json::to_vec_pretty(cart).map_err(|e| AppError::Cache(e.to_string()))?;
    fs::write(&self.path, body).map_err(|e| AppError::Cache(format!("{}: {}", self.path.display(), e)))
  }

  fn clear(&self) -> Result<()> {
    match fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(AppError::Cache(format!("{}: {}", self.path.display(), e))),
    }
  }
}

/// In-process cache for tests and for runs without a cache path.
#[derive(Debug, Default)]
pub struct MemoryCartCache {
  inner: Mutex<Option<CachedCart>>,
}

impl MemoryCartCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_cart(cart: CachedCart) -> Self {
    Self {
      inner: Mutex::new(Some(cart)),
    }
  }
}

impl CartCache for MemoryCartCache {
  fn load(&self) -> Option<CachedCart> {
    self.inner.lock().clone()
  }

  fn store(&self, cart: &CachedCart) -> Result<()> {
    *self.inner.lock() = Some(cart.clone());
    Ok(())
  }

  fn clear(&self) -> Result<()> {
    *self.inner.lock() = None;
    Ok(())
  }
}
