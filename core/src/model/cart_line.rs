// solecart/src/model/cart_line.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(pub u64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }

    impl From<u64> for $name {
      fn from(raw: u64) -> Self {
        $name(raw)
      }
    }
  };
}

numeric_id!(
  /// Identifier of a cart line. Stable across quantity updates.
  LineId
);
numeric_id!(ProductId);
numeric_id!(SizeId);

/// One product-variant row in the shopping cart.
///
/// `quantity` is what the user sees, which may be an optimistic value that the
/// server has not confirmed yet. Everything else is server-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
  pub id: LineId,
  pub product_id: ProductId,
  pub size_id: SizeId,
  pub quantity: u32,
  /// Stock ceiling. `None` and `Some(0)` both mean "unknown".
  #[serde(default)]
  pub available_quantity: Option<u32>,
  pub unit_price: Decimal,
  #[serde(default)]
  pub product_name: String,
  #[serde(default)]
  pub size_label: String,
}

impl CartLine {
  /// The enforceable upper bound for `quantity`, if the server reported one.
  pub fn stock_ceiling(&self) -> Option<u32> {
    self.available_quantity.filter(|available| *available > 0)
  }

  pub fn line_total(&self) -> Decimal {
    self.unit_price * Decimal::from(self.quantity)
  }

  /// Payload persisting `quantity` for this line's variant.
  pub fn update_for(&self, quantity: u32) -> LineUpdate {
    LineUpdate {
      product_id: self.product_id,
      size_id: self.size_id,
      quantity,
    }
  }
}

/// Body of an `update_line` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineUpdate {
  pub product_id: ProductId,
  pub size_id: SizeId,
  pub quantity: u32,
}
