// solecart/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::model::LineId;

#[derive(Debug, Error)]
pub enum CartError {
  #[error("Quantity must be at least {minimum} (line {line_id}, requested {requested})")]
  QuantityBelowMinimum {
    line_id: LineId,
    requested: u32,
    minimum: u32,
  },

  #[error("Quantity {requested} for line {line_id} exceeds the {available} available")]
  QuantityAboveStock {
    line_id: LineId,
    requested: u32,
    available: u32,
  },

  #[error("Cart line not found: {line_id}")]
  LineNotFound { line_id: LineId },

  #[error("Cart session has been closed")]
  SessionClosed,

  /// The cart service answered but refused the request. `message` is the
  /// server-provided text, if any.
  #[error("Cart service rejected the request: {}", message.as_deref().unwrap_or("no message"))]
  Service { message: Option<String> },

  #[error("Cart service transport failure. Source: {source}")]
  Transport {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error: {0}")]
  Configuration(String),
}

impl CartError {
  /// Text for the toast shown to the user: the server message when the
  /// service supplied one, otherwise `generic`.
  pub fn user_message(&self, generic: &str) -> String {
    match self {
      CartError::Service { message: Some(m) } if !m.trim().is_empty() => m.clone(),
      _ => generic.to_string(),
    }
  }

  /// Input rejections are decided locally and never reach the service.
  pub fn is_rejected_input(&self) -> bool {
    matches!(
      self,
      CartError::QuantityBelowMinimum { .. } | CartError::QuantityAboveStock { .. }
    )
  }
}

impl From<AnyhowError> for CartError {
  fn from(err: AnyhowError) -> Self {
    // Services that already produced a CartError and then went through anyhow
    // keep their server message.
    match err.downcast::<CartError>() {
      Ok(cart_err) => cart_err,
      Err(source) => CartError::Transport { source },
    }
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
