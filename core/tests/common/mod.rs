// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use solecart::{
  CartError, CartLine, CartPage, CartResult, CartService, CartStore, LineId, LineUpdate, Notifier, Pagination,
  ProductId, QuantityReconciler, ReconcilerConfig, SizeId,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Level;

pub const L1: LineId = LineId(1);
pub const L2: LineId = LineId(2);
pub const L3: LineId = LineId(3);

// --- Fixtures ---

pub fn cart_line(id: u64, quantity: u32, available: Option<u32>) -> CartLine {
  CartLine {
    id: LineId(id),
    product_id: ProductId(100 + id),
    size_id: SizeId(7),
    quantity,
    available_quantity: available,
    unit_price: Decimal::new(18100, 2),
    product_name: format!("BC13{:02}", id),
    size_label: "7".to_string(),
  }
}

// --- Scripted cart service ---

#[derive(Debug, Clone)]
pub enum Outcome {
  Ok,
  Refuse(Option<String>),
  Transport,
}

#[derive(Debug, Clone)]
pub struct Scripted {
  pub delay: Duration,
  pub outcome: Outcome,
}

impl Scripted {
  pub fn ok_after(ms: u64) -> Self {
    Self {
      delay: Duration::from_millis(ms),
      outcome: Outcome::Ok,
    }
  }

  pub fn refuse_after(ms: u64, message: Option<&str>) -> Self {
    Self {
      delay: Duration::from_millis(ms),
      outcome: Outcome::Refuse(message.map(str::to_string)),
    }
  }

  pub fn transport_after(ms: u64) -> Self {
    Self {
      delay: Duration::from_millis(ms),
      outcome: Outcome::Transport,
    }
  }
}

#[derive(Debug, Clone)]
pub struct UpdateCall {
  pub line_id: LineId,
  pub update: LineUpdate,
  pub at: Instant,
}

/// In-memory cart service. `update_line` outcomes are consumed from a script
/// in call order; an empty script means immediate success.
#[derive(Default)]
pub struct MockCartService {
  server_lines: Mutex<Vec<CartLine>>,
  script: Mutex<VecDeque<Scripted>>,
  updates: Mutex<Vec<UpdateCall>>,
  fetches: Mutex<Vec<(u32, u32)>>,
  removals: Mutex<Vec<LineId>>,
  fail_fetch: Mutex<Option<Outcome>>,
  fail_removal: Mutex<Option<Outcome>>,
}

impl MockCartService {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_lines(lines: Vec<CartLine>) -> Self {
    let service = Self::new();
    *service.server_lines.lock() = lines;
    service
  }

  pub fn script(&self, steps: impl IntoIterator<Item = Scripted>) {
    self.script.lock().extend(steps);
  }

  pub fn fail_fetch_with(&self, outcome: Outcome) {
    *self.fail_fetch.lock() = Some(outcome);
  }

  pub fn fail_removal_with(&self, outcome: Outcome) {
    *self.fail_removal.lock() = Some(outcome);
  }

  pub fn set_server_quantity(&self, line_id: LineId, quantity: u32) {
    if let Some(line) = self.server_lines.lock().iter_mut().find(|l| l.id == line_id) {
      line.quantity = quantity;
    }
  }

  pub fn update_calls(&self) -> Vec<UpdateCall> {
    self.updates.lock().clone()
  }

  pub fn updated_quantities(&self, line_id: LineId) -> Vec<u32> {
    self
      .updates
      .lock()
      .iter()
      .filter(|c| c.line_id == line_id)
      .map(|c| c.update.quantity)
      .collect()
  }

  pub fn fetch_calls(&self) -> Vec<(u32, u32)> {
    self.fetches.lock().clone()
  }

  pub fn removed(&self) -> Vec<LineId> {
    self.removals.lock().clone()
  }

  fn into_result(outcome: Outcome) -> CartResult<()> {
    match outcome {
      Outcome::Ok => Ok(()),
      Outcome::Refuse(message) => Err(CartError::Service { message }),
      Outcome::Transport => Err(anyhow::anyhow!("connection reset by peer").into()),
    }
  }
}

#[async_trait]
impl CartService for MockCartService {
  async fn update_line(&self, line_id: LineId, update: LineUpdate) -> CartResult<()> {
    self.updates.lock().push(UpdateCall {
      line_id,
      update,
      at: Instant::now(),
    });
    let step = self.script.lock().pop_front().unwrap_or(Scripted::ok_after(0));
    if !step.delay.is_zero() {
      tokio::time::sleep(step.delay).await;
    }
    let result = Self::into_result(step.outcome);
    if result.is_ok() {
      self.set_server_quantity(line_id, update.quantity);
    }
    result
  }

  async fn fetch_cart(&self, page: u32, page_size: u32) -> CartResult<CartPage> {
    self.fetches.lock().push((page, page_size));
    if let Some(outcome) = self.fail_fetch.lock().clone() {
      Self::into_result(outcome)?;
    }
    let lines = self.server_lines.lock().clone();
    let total_items = lines.len() as u64;
    let total_pages = ((lines.len() as u32) + page_size - 1) / page_size;
    let start = ((page.saturating_sub(1)) * page_size) as usize;
    let page_lines = lines.into_iter().skip(start).take(page_size as usize).collect();
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

  async fn remove_line(&self, line: &CartLine) -> CartResult<()> {
    if let Some(outcome) = self.fail_removal.lock().clone() {
      Self::into_result(outcome)?;
    }
    self.server_lines.lock().retain(|l| l.id != line.id);
    self.removals.lock().push(line.id);
    Ok(())
  }
}

// --- Recording notifier ---

#[derive(Default)]
pub struct RecordingNotifier {
  messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
  pub fn messages(&self) -> Vec<String> {
    self.messages.lock().clone()
  }

  pub fn last(&self) -> Option<String> {
    self.messages.lock().last().cloned()
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&self, message: &str) {
    self.messages.lock().push(message.to_string());
  }
}

// --- Harness ---

pub struct Harness {
  pub reconciler: QuantityReconciler,
  pub store: CartStore,
  pub service: Arc<MockCartService>,
  pub toasts: Arc<RecordingNotifier>,
  pub started: Instant,
}

/// A reconciler over `lines` with the default 800 ms quiet period.
pub fn harness(lines: Vec<CartLine>) -> Harness {
  let store = CartStore::with_lines(lines.clone());
  let service = Arc::new(MockCartService::with_lines(lines));
  let toasts = Arc::new(RecordingNotifier::default());
  let reconciler = QuantityReconciler::new(
    store.clone(),
    service.clone(),
    toasts.clone(),
    ReconcilerConfig::default(),
  )
  .expect("runtime available in tests");
  Harness {
    reconciler,
    store,
    service,
    toasts,
    started: Instant::now(),
  }
}

/// Lets paused test time move forward, running every timer due on the way.
pub async fn advance(ms: u64) {
  tokio::time::sleep(Duration::from_millis(ms)).await;
}

// --- Tracing ---

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
