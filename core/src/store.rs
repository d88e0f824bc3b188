// solecart/src/store.rs

//! Client-local cart state owned by one cart session.
//!
//! Each line carries its reconciliation bookkeeping next to the visible data:
//! the last server-confirmed quantity and the generation counters that let a
//! late persistence result tell whether it has been superseded.
//!
//! Lock guards from `CartStore` are blocking and must be dropped before any
//! `.await`.

use crate::model::{CartLine, CartSummary, LineId};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Reconciliation phase of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePhase {
  Idle,
  /// A debounce timer is running and the optimistic value is shown.
  PendingDebounce,
  /// A persistence request is in flight.
  Persisting,
}

#[derive(Debug, Clone)]
pub(crate) struct LineEntry {
  pub(crate) line: CartLine,
  pub(crate) confirmed_quantity: u32,
  /// Bumped by every accepted change. A request carries the value current
  /// when it was scheduled.
  pub(crate) latest_generation: u64,
  /// Generation of the newest request the server acknowledged.
  pub(crate) confirmed_generation: u64,
  /// Generation of the last request whose failure rolled the line back.
  pub(crate) rolled_back_generation: u64,
  pub(crate) in_flight: u32,
  pub(crate) debounce_pending: bool,
}

impl LineEntry {
  fn from_server(line: CartLine) -> Self {
    Self {
      confirmed_quantity: line.quantity,
      line,
      latest_generation: 0,
      confirmed_generation: 0,
      rolled_back_generation: 0,
      in_flight: 0,
      debounce_pending: false,
    }
  }

  /// Re-seeds the entry with fresh server data. Generations keep moving
  /// forward so that results of requests issued before the refresh count as
  /// superseded.
  fn refresh(&mut self, line: CartLine) {
    self.latest_generation += 1;
    self.confirmed_generation = self.latest_generation;
    self.confirmed_quantity = line.quantity;
    self.debounce_pending = false;
    self.line = line;
  }

  pub(crate) fn phase(&self) -> LinePhase {
    if self.debounce_pending {
      LinePhase::PendingDebounce
    } else if self.in_flight > 0 {
      LinePhase::Persisting
    } else {
      LinePhase::Idle
    }
  }

  fn view(&self) -> LineView {
    LineView {
      line: self.line.clone(),
      confirmed_quantity: self.confirmed_quantity,
      updating: self.in_flight > 0,
      phase: self.phase(),
    }
  }
}

/// Read-only snapshot of a line for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
  pub line: CartLine,
  pub confirmed_quantity: u32,
  /// Drives the per-line spinner.
  pub updating: bool,
  pub phase: LinePhase,
}

#[derive(Debug, Default)]
pub struct CartBook {
  entries: Vec<LineEntry>,
  closed: bool,
}

impl CartBook {
  pub(crate) fn entry(&self, line_id: LineId) -> Option<&LineEntry> {
    self.entries.iter().find(|e| e.line.id == line_id)
  }

  pub(crate) fn entry_mut(&mut self, line_id: LineId) -> Option<&mut LineEntry> {
    self.entries.iter_mut().find(|e| e.line.id == line_id)
  }

  /// Replaces the whole cart, e.g. on pull-to-refresh. Lines that survive
  /// keep their in-flight count so their spinners clear correctly.
  pub(crate) fn replace_all(&mut self, lines: Vec<CartLine>) {
    let mut previous = std::mem::take(&mut self.entries);
    self.entries = lines
      .into_iter()
      .map(|line| match previous.iter().position(|e| e.line.id == line.id) {
        Some(idx) => {
          let mut entry = previous.swap_remove(idx);
          entry.refresh(line);
          entry
        }
        None => LineEntry::from_server(line),
      })
      .collect();
  }

  /// Appends a further page. A line that is already present only has its
  /// server-owned fields refreshed unless it is idle.
  pub(crate) fn merge_page(&mut self, lines: Vec<CartLine>) {
    for line in lines {
      match self.entry_mut(line.id) {
        Some(entry) if entry.phase() == LinePhase::Idle => entry.refresh(line),
        Some(entry) => {
          entry.line.available_quantity = line.available_quantity;
          entry.line.unit_price = line.unit_price;
          entry.line.product_name = line.product_name;
          entry.line.size_label = line.size_label;
        }
        None => self.entries.push(LineEntry::from_server(line)),
      }
    }
  }

  pub(crate) fn remove(&mut self, line_id: LineId) -> Option<CartLine> {
    let idx = self.entries.iter().position(|e| e.line.id == line_id)?;
    Some(self.entries.remove(idx).line)
  }

  pub(crate) fn clear_pending_marks(&mut self) {
    for entry in &mut self.entries {
      entry.debounce_pending = false;
    }
  }

  pub(crate) fn close(&mut self) {
    self.closed = true;
  }

  pub fn is_closed(&self) -> bool {
    self.closed
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn views(&self) -> Vec<LineView> {
    self.entries.iter().map(LineEntry::view).collect()
  }

  pub fn view(&self, line_id: LineId) -> Option<LineView> {
    self.entry(line_id).map(LineEntry::view)
  }

  pub fn summary(&self) -> CartSummary {
    CartSummary::from_lines(self.entries.iter().map(|e| &e.line))
  }
}

/// Shared handle to a `CartBook`. Cloning shares the same book.
#[derive(Debug, Clone, Default)]
pub struct CartStore(Arc<RwLock<CartBook>>);

impl CartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_lines(lines: Vec<CartLine>) -> Self {
    let store = Self::new();
    store.write().replace_all(lines);
    store
  }

  /// The returned guard MUST be dropped before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, CartBook> {
    self.0.read()
  }

  pub(crate) fn write(&self) -> RwLockWriteGuard<'_, CartBook> {
    self.0.write()
  }

  pub fn snapshot(&self) -> Vec<LineView> {
    self.read().views()
  }

  pub fn view(&self, line_id: LineId) -> Option<LineView> {
    self.read().view(line_id)
  }

  pub fn quantity_of(&self, line_id: LineId) -> Option<u32> {
    self.read().entry(line_id).map(|e| e.line.quantity)
  }

  pub fn confirmed_quantity_of(&self, line_id: LineId) -> Option<u32> {
    self.read().entry(line_id).map(|e| e.confirmed_quantity)
  }

  pub fn is_updating(&self, line_id: LineId) -> bool {
    self.read().entry(line_id).map_or(false, |e| e.in_flight > 0)
  }

  pub fn phase_of(&self, line_id: LineId) -> Option<LinePhase> {
    self.read().entry(line_id).map(LineEntry::phase)
  }

  pub fn summary(&self) -> CartSummary {
    self.read().summary()
  }
}
