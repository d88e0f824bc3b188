// solecart/src/service.rs

//! The remote cart collaborator, consumed only through this trait. The HTTP
//! transport behind it (endpoints, headers, auth) lives outside this crate.

use crate::error::CartResult;
use crate::model::{CartLine, CartPage, LineId, LineUpdate};
use async_trait::async_trait;

#[async_trait]
pub trait CartService: Send + Sync + 'static {
  /// Persists a new quantity for an existing line.
  ///
  /// A refusal should be reported as `CartError::Service { message }` so the
  /// server's text reaches the user. Anything else is treated as a transport
  /// failure and shown with the generic message.
  async fn update_line(&self, line_id: LineId, update: LineUpdate) -> CartResult<()>;

  /// Reads one page of the cart. Pages are 1-based.
  async fn fetch_cart(&self, page: u32, page_size: u32) -> CartResult<CartPage>;

  /// Deletes a line. The service keys deletions by line id plus variant.
  async fn remove_line(&self, line: &CartLine) -> CartResult<()>;
}
