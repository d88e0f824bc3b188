// solecart/src/model/page.rs

use super::CartLine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  pub page: u32,
  pub page_size: u32,
  pub total_items: u64,
  pub total_pages: u32,
}

impl Pagination {
  pub fn has_more(&self) -> bool {
    self.page < self.total_pages
  }
}

/// One page of the cart as returned by `fetch_cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPage {
  #[serde(rename = "data")]
  pub lines: Vec<CartLine>,
  pub pagination: Pagination,
}

impl CartPage {
  pub fn has_more(&self) -> bool {
    self.pagination.has_more()
  }
}
