// demos/storefront_app/src/errors.rs

use solecart::CartError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Cart Error: {source}")]
  Cart {
    #[from]
    source: CartError,
  },

  #[error("Fixture Error: {0}")]
  Fixture(#[from] serde_json::Error),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = DemoError> = std::result::Result<T, E>;
