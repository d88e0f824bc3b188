// solecart/src/stock.rs

//! Stock ceilings for adding a size to the cart from the product page.

/// Quantity the user may still add given the stock and what the cart holds.
pub fn remaining_allowance(available: u32, in_cart: u32) -> u32 {
  available.saturating_sub(in_cart)
}

/// Why a requested add-to-cart quantity was clamped, with the value it was
/// clamped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockNotice {
  AlreadyInCart { in_cart: u32, remaining: u32 },
  OutOfStock { available: u32, size_label: String },
}

impl StockNotice {
  /// The quantity the input should snap back to.
  pub fn clamped_quantity(&self) -> u32 {
    match self {
      StockNotice::AlreadyInCart { remaining, .. } => *remaining,
      StockNotice::OutOfStock { available, .. } => *available,
    }
  }

  pub fn message(&self) -> String {
    match self {
      StockNotice::AlreadyInCart { in_cart, remaining } => {
        format!("Item already in cart ({}). You can only add {} more.", in_cart, remaining)
      }
      StockNotice::OutOfStock { available, size_label } => {
        format!("Only {} items available for size {}", available, size_label)
      }
    }
  }
}

impl std::fmt::Display for StockNotice {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message())
  }
}

/// Validates a quantity typed or tapped on the product page.
pub fn check_add_quantity(size_label: &str, available: u32, in_cart: u32, requested: u32) -> Result<u32, StockNotice> {
  let remaining = remaining_allowance(available, in_cart);
  if requested <= remaining {
    return Ok(requested);
  }
  if in_cart > 0 {
    Err(StockNotice::AlreadyInCart { in_cart, remaining })
  } else {
    Err(StockNotice::OutOfStock {
      available,
      size_label: size_label.to_string(),
    })
  }
}
