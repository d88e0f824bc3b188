// solecart/src/config.rs

use crate::error::{CartError, CartResult};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to update quantity. Please try again.";

/// Tuning for a cart session and its quantity reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
  /// Quiet period after the last change to a line before it is persisted.
  pub debounce: Duration,
  /// Lines requested per `fetch_cart` call.
  pub page_size: u32,
  /// Toast text for persistence failures that carry no server message.
  pub generic_failure_message: String,
  pub min_quantity: u32,
}

impl Default for ReconcilerConfig {
  fn default() -> Self {
    Self {
      debounce: DEFAULT_DEBOUNCE,
      page_size: DEFAULT_PAGE_SIZE,
      generic_failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
      min_quantity: 1,
    }
  }
}

impl ReconcilerConfig {
  pub fn with_debounce(mut self, debounce: Duration) -> Self {
    self.debounce = debounce;
    self
  }

  pub fn with_page_size(mut self, page_size: u32) -> Self {
    self.page_size = page_size;
    self
  }

  pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
    self.generic_failure_message = message.into();
    self
  }

  /// Reads overrides from the environment (and a `.env` file if present).
  /// Unset variables keep their defaults; malformed ones are an error.
  pub fn from_env() -> CartResult<Self> {
    dotenv().ok();

    let mut config = Self::default();

    if let Ok(raw) = env::var("SOLECART_DEBOUNCE_MS") {
      let millis = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| CartError::Configuration(format!("Invalid SOLECART_DEBOUNCE_MS '{}': {}", raw, e)))?;
      config.debounce = Duration::from_millis(millis);
    }

    if let Ok(raw) = env::var("SOLECART_PAGE_SIZE") {
      let page_size = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| CartError::Configuration(format!("Invalid SOLECART_PAGE_SIZE '{}': {}", raw, e)))?;
      if page_size == 0 {
        return Err(CartError::Configuration("SOLECART_PAGE_SIZE must be positive".to_string()));
      }
      config.page_size = page_size;
    }

    if let Ok(message) = env::var("SOLECART_FAILURE_MESSAGE") {
      if !message.trim().is_empty() {
        config.generic_failure_message = message;
      }
    }

    tracing::debug!(?config, "Reconciler configuration loaded.");
    Ok(config)
  }
}
