// solecart/src/model/summary.rs

use super::CartLine;
use rust_decimal::Decimal;
use serde::Serialize;

/// Totals shown under the cart ("Total Quantity" / "Net Amount").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartSummary {
  pub line_count: usize,
  pub total_quantity: u64,
  pub net_amount: Decimal,
}

impl CartSummary {
  pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Self {
    lines.into_iter().fold(CartSummary::default(), |mut acc, line| {
      acc.line_count += 1;
      acc.total_quantity += u64::from(line.quantity);
      acc.net_amount += line.line_total();
      acc
    })
  }
}
