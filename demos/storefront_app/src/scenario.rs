// demos/storefront_app/src/scenario.rs

//! A scripted visit to the cart screen.

use crate::errors::Result as DemoResult;
use crate::state::StorefrontState;
use serde::Serialize;
use solecart::{CartSession, CartSummary, LineId, LinePhase};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize)]
pub struct LineReport {
  pub line_id: LineId,
  pub product_name: String,
  pub size_label: String,
  pub quantity: u32,
  pub confirmed_quantity: u32,
  pub server_quantity: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CartReport {
  pub lines: Vec<LineReport>,
  pub summary: CartSummary,
  pub toasts: Vec<String>,
}

enum Step {
  Tap { line: u64, quantity: u32, after_ms: u64 },
  Remove { line: u64 },
  Settle,
}

fn script() -> Vec<Step> {
  vec![
    // Two quick taps on the first line coalesce into a single update.
    Step::Tap { line: 1, quantity: 3, after_ms: 0 },
    Step::Tap { line: 1, quantity: 4, after_ms: 100 },
    // Above the stock of line 2, never sent.
    Step::Tap { line: 2, quantity: 4, after_ms: 50 },
    Step::Tap { line: 3, quantity: 0, after_ms: 50 },
    // Within stock but refused by the service, rolls back.
    Step::Tap { line: 5, quantity: 6, after_ms: 50 },
    Step::Remove { line: 4 },
    Step::Settle,
  ]
}

#[instrument(name = "scenario::run_cart_visit", skip_all)]
pub async fn run_cart_visit(state: &StorefrontState) -> DemoResult<CartReport> {
  let auth = state.app.auth();
  if !auth.logged_in && !auth.guest_user {
    warn!("Opening the cart without a signed-in or guest user.");
  }

  let session = CartSession::open(
    state.cart_service.clone(),
    Arc::new(state.toast.clone()),
    state.config.reconciler.clone(),
  )?;

  let mut loaded = session.load_first_page().await?;
  while session.load_next_page().await? {
    loaded = session.lines().len();
  }
  info!(loaded, "Cart loaded.");

  let settle_time = state.config.reconciler.debounce + state.config.simulated_latency * 2 + Duration::from_millis(50);
  let mut toasts = Vec::new();

  for step in script() {
    match step {
      Step::Tap { line, quantity, after_ms } => {
        tokio::time::sleep(Duration::from_millis(after_ms)).await;
        if let Err(e) = session.request_quantity_change(LineId::from(line), quantity) {
          info!(line, quantity, error = %e, "Tap not accepted.");
        }
      }
      Step::Remove { line } => {
        if let Err(e) = session.remove_line(LineId::from(line)).await {
          warn!(line, error = %e, "Removal failed.");
        }
      }
      Step::Settle => {
        tokio::time::sleep(settle_time).await;
        let still_busy = session.lines().iter().filter(|v| v.phase != LinePhase::Idle).count();
        info!(still_busy, "Cart settled.");
      }
    }
    if let Some(toast) = state.toast.take() {
      toasts.push(toast);
    }
  }

  let lines = session
    .lines()
    .into_iter()
    .map(|view| LineReport {
      line_id: view.line.id,
      server_quantity: state.cart_service.server_quantity(view.line.id),
      product_name: view.line.product_name,
      size_label: view.line.size_label,
      quantity: view.line.quantity,
      confirmed_quantity: view.confirmed_quantity,
    })
    .collect();
  let summary = session.summary();
  session.close();

  Ok(CartReport { lines, summary, toasts })
}
