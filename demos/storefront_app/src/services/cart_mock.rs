// demos/storefront_app/src/services/cart_mock.rs
use crate::errors::Result as DemoResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use solecart::{CartError, CartLine, CartPage, CartResult, CartService, LineId, LineUpdate, Pagination};
use std::time::Duration;
use tracing::{info, instrument, warn};

const BUNDLED_CART: &str = include_str!("../../fixtures/cart.json");

/// In-memory cart service with network-like latency.
#[derive(Debug)]
pub struct SimulatedCartService {
  lines: Mutex<Vec<CartLine>>,
  latency: Duration,
  refuse_above: Option<u32>,
}

impl SimulatedCartService {
  /// Seeds the service from a `fetch_cart`-shaped JSON payload, or the
  /// bundled one when `payload` is `None`.
  pub fn from_payload(payload: Option<&str>, latency: Duration, refuse_above: Option<u32>) -> DemoResult<Self> {
    let page: CartPage = serde_json::from_str(payload.unwrap_or(BUNDLED_CART))?;
    info!(lines = page.lines.len(), "Simulated cart seeded.");
    Ok(Self {
      lines: Mutex::new(page.lines),
      latency,
      refuse_above,
    })
  }

  pub fn server_quantity(&self, line_id: LineId) -> Option<u32> {
    self.lines.lock().iter().find(|l| l.id == line_id).map(|l| l.quantity)
  }

  async fn simulate_latency(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

#[async_trait]
impl CartService for SimulatedCartService {
  #[instrument(skip(self, update), fields(line_id = %line_id, quantity = update.quantity))]
  async fn update_line(&self, line_id: LineId, update: LineUpdate) -> CartResult<()> {
    self.simulate_latency().await;

    if let Some(limit) = self.refuse_above {
      if update.quantity > limit {
        warn!("Simulated service refusing quantity above {}", limit);
        return Err(CartError::Service {
          message: Some(format!("Orders above {} pairs per size need a sales quote", limit)),
        });
      }
    }

    let mut lines = self.lines.lock();
    let line = lines
      .iter_mut()
      .find(|l| l.id == line_id && l.product_id == update.product_id && l.size_id == update.size_id)
      .ok_or_else(|| CartError::Service {
        message: Some("Cart item not found".to_string()),
      })?;
    line.quantity = update.quantity;
    info!("Simulated service stored quantity.");
    Ok(())
  }

  #[instrument(skip(self))]
  async fn fetch_cart(&self, page: u32, page_size: u32) -> CartResult<CartPage> {
    self.simulate_latency().await;
    if page == 0 || page_size == 0 {
      return Err(CartError::Service {
        message: Some("Invalid page request".to_string()),
      });
    }

    let lines = self.lines.lock();
    let total_items = lines.len() as u64;
    let total_pages = lines.len().div_ceil(page_size as usize) as u32;
    let start = (page as usize - 1) * page_size as usize;
    let page_lines = lines.iter().skip(start).take(page_size as usize).cloned().collect();

    Ok(CartPage {
      lines: page_lines,
      pagination: Pagination {
        page,
        page_size,
        total_items,
        total_pages,
      },
    })
  }

  #[instrument(skip(self, line), fields(line_id = %line.id))]
  async fn remove_line(&self, line: &CartLine) -> CartResult<()> {
    self.simulate_latency().await;
    let mut lines = self.lines.lock();
    let before = lines.len();
    lines.retain(|l| !(l.id == line.id && l.product_id == line.product_id && l.size_id == line.size_id));
    if lines.len() == before {
      return Err(CartError::Service {
        message: Some("Cart item not found".to_string()),
      });
    }
    info!("Simulated service removed line.");
    Ok(())
  }
}
