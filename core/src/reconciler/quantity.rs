// solecart/src/reconciler/quantity.rs

use crate::error::{CartError, CartResult};
use crate::model::CartLine;

/// Checks `requested` against `[minimum, stock ceiling]` for `line`.
pub fn check_quantity(line: &CartLine, requested: u32, minimum: u32) -> CartResult<u32> {
  if requested < minimum {
    return Err(CartError::QuantityBelowMinimum {
      line_id: line.id,
      requested,
      minimum,
    });
  }
  match line.stock_ceiling() {
    Some(available) if requested > available => Err(CartError::QuantityAboveStock {
      line_id: line.id,
      requested,
      available,
    }),
    _ => Ok(requested),
  }
}

/// Toast text for a rejected quantity. `None` for errors that are not input
/// rejections.
pub fn rejection_notice(err: &CartError) -> Option<String> {
  match err {
    CartError::QuantityBelowMinimum { minimum, .. } => Some(format!("Quantity must be at least {}", minimum)),
    CartError::QuantityAboveStock { available, .. } => Some(format!("Only {} items available", available)),
    _ => None,
  }
}
