// solecart/examples/quantity_burst.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use solecart::{
  CartError, CartLine, CartPage, CartResult, CartService, CartSession, LineId, LineUpdate, Pagination, ProductId,
  ReconcilerConfig, SizeId, TracingNotifier,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// 1. A stand-in cart service that refuses quantities above 6.
struct DemoService {
  lines: Vec<CartLine>,
}

#[async_trait]
impl CartService for DemoService {
  async fn update_line(&self, line_id: LineId, update: LineUpdate) -> CartResult<()> {
    tokio::time::sleep(Duration::from_millis(120)).await;
    info!(%line_id, quantity = update.quantity, "Server received update.");
    if update.quantity > 6 {
      return Err(CartError::Service {
        message: Some("Bulk quantities need a sales quote".to_string()),
      });
    }
    Ok(())
  }

  async fn fetch_cart(&self, page: u32, page_size: u32) -> CartResult<CartPage> {
    Ok(CartPage {
      lines: self.lines.clone(),
      pagination: Pagination {
        page,
        page_size,
        total_items: self.lines.len() as u64,
        total_pages: 1,
      },
    })
  }

  async fn remove_line(&self, _line: &CartLine) -> CartResult<()> {
    Ok(())
  }
}

#[tokio::main]
async fn main() -> Result<(), CartError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Quantity Burst Example ---");

  // 2. Open a session over a one-line cart.
  let service = Arc::new(DemoService {
    lines: vec![CartLine {
      id: LineId(1),
      product_id: ProductId(1303),
      size_id: SizeId(8),
      quantity: 2,
      available_quantity: Some(10),
      unit_price: Decimal::new(18100, 2),
      product_name: "BC1303".to_string(),
      size_label: "8".to_string(),
    }],
  });
  let config = ReconcilerConfig::default().with_debounce(Duration::from_millis(300));
  let session = CartSession::open(service, Arc::new(TracingNotifier), config)?;
  session.load_first_page().await?;

  // 3. Three quick taps become one request for 5.
  for quantity in 3..=5 {
    session.request_quantity_change(LineId(1), quantity)?;
    tokio::time::sleep(Duration::from_millis(100)).await;
  }
  tokio::time::sleep(Duration::from_millis(600)).await;
  info!(summary = ?session.summary(), "After first burst.");

  // 4. A refused quantity is rolled back and toasted.
  session.request_quantity_change(LineId(1), 8)?;
  tokio::time::sleep(Duration::from_millis(600)).await;
  info!(quantity = ?session.store().quantity_of(LineId(1)), "After refused change.");

  session.close();
  Ok(())
}
