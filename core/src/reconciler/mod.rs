// solecart/src/reconciler/mod.rs

//! The cart quantity reconciler.
//!
//! A quantity change is applied to the store at once, then persisted after a
//! quiet period. Changes to the same line inside the quiet period coalesce
//! into one `update_line` call carrying the last value. A failed call rolls
//! the line back to its last confirmed quantity, unless a newer change has
//! been accepted for that line since the failing request was issued.
//!
//! Dropping the last handle tears the reconciler down like `shutdown`.

mod pending;
pub mod quantity;

use crate::config::ReconcilerConfig;
use crate::error::{CartError, CartResult};
use crate::model::{CartLine, LineId, LineUpdate};
use crate::notify::Notifier;
use crate::service::CartService;
use crate::store::CartStore;
use parking_lot::Mutex;
use pending::{PendingUpdate, TimerArena};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, event, info, instrument, warn, Level};

pub use quantity::{check_quantity, rejection_notice};

struct Inner {
  store: CartStore,
  // Lock order: store first, then timers.
  timers: Mutex<TimerArena>,
  service: Arc<dyn CartService>,
  notifier: Arc<dyn Notifier>,
  config: ReconcilerConfig,
  runtime: Handle,
}

/// Shuts the reconciler down when the last user handle goes away. Timer
/// tasks hold `Inner` directly and never this guard.
struct TeardownOnDrop(Arc<Inner>);

impl Drop for TeardownOnDrop {
  fn drop(&mut self) {
    self.0.shutdown();
  }
}

/// Owns the debounce timers for every line of one cart store.
///
/// Cloning yields another handle to the same reconciler.
#[derive(Clone)]
pub struct QuantityReconciler {
  handle: Arc<TeardownOnDrop>,
}

impl std::fmt::Debug for QuantityReconciler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QuantityReconciler")
      .field("config", &self.inner().config)
      .field("pending_timers", &self.inner().timers.lock().len())
      .finish()
  }
}

impl QuantityReconciler {
  /// Must be called from within a Tokio runtime; timers are spawned on it.
  pub fn new(
    store: CartStore,
    service: Arc<dyn CartService>,
    notifier: Arc<dyn Notifier>,
    config: ReconcilerConfig,
  ) -> CartResult<Self> {
    let runtime = Handle::try_current()
      .map_err(|e| CartError::Configuration(format!("QuantityReconciler needs a Tokio runtime: {}", e)))?;
    let inner = Arc::new(Inner {
      store,
      timers: Mutex::new(TimerArena::default()),
      service,
      notifier,
      config,
      runtime,
    });
    Ok(Self {
      handle: Arc::new(TeardownOnDrop(inner)),
    })
  }

  fn inner(&self) -> &Arc<Inner> {
    &self.handle.0
  }

  pub fn store(&self) -> &CartStore {
    &self.inner().store
  }

  pub fn config(&self) -> &ReconcilerConfig {
    &self.inner().config
  }

  /// Applies `new_quantity` to the line immediately and (re)schedules its
  /// persistence. Never blocks.
  ///
  /// Out-of-range quantities are rejected without touching state or the
  /// network; the user is told the allowed bound. The returned error is
  /// informational, the toast has already been raised.
  #[instrument(
    name = "QuantityReconciler::request_quantity_change",
    skip_all,
    fields(line_id = %line_id, quantity = new_quantity)
  )]
  pub fn request_quantity_change(&self, line_id: LineId, new_quantity: u32) -> CartResult<()> {
    let inner = self.inner();
    let mut book = inner.store.write();

    if book.is_closed() {
      warn!("Quantity change after teardown ignored.");
      return Err(CartError::SessionClosed);
    }

    let Some(entry) = book.entry_mut(line_id) else {
      warn!("Quantity change for unknown line.");
      return Err(CartError::LineNotFound { line_id });
    };

    if let Err(rejection) = check_quantity(&entry.line, new_quantity, inner.config.min_quantity) {
      drop(book);
      info!(reason = %rejection, "Quantity change rejected.");
      if let Some(notice) = rejection_notice(&rejection) {
        inner.notifier.notify(&notice);
      }
      return Err(rejection);
    }

    entry.line.quantity = new_quantity;
    entry.latest_generation += 1;
    entry.debounce_pending = true;
    let generation = entry.latest_generation;

    // Scheduled under the store lock so two racing calls for one line cannot
    // leave the older timer installed.
    let task = inner
      .runtime
      .spawn(Inner::debounce_then_persist(Arc::clone(inner), line_id, generation));
    let replaced = inner.timers.lock().replace(line_id, PendingUpdate::new(task, generation));
    drop(book);

    debug!(generation, replaced, "Optimistic quantity applied, persistence scheduled.");
    Ok(())
  }

  /// Cancels the pending timer of one line, e.g. before the line is removed.
  /// Returns the optimistic quantity that was waiting to be persisted, if it
  /// differs from the confirmed one.
  #[instrument(name = "QuantityReconciler::forget_line", skip_all, fields(line_id = %line_id))]
  pub fn forget_line(&self, line_id: LineId) -> Option<u32> {
    let mut book = self.inner().store.write();
    let cancelled = self.inner().timers.lock().cancel(line_id);
    let entry = book.entry_mut(line_id)?;
    entry.debounce_pending = false;
    debug!(cancelled, "Line timer released.");
    (entry.line.quantity != entry.confirmed_quantity).then_some(entry.line.quantity)
  }

  /// Cancels every pending timer without closing the reconciler. Used before
  /// the cart is reloaded from the server.
  pub fn cancel_pending(&self) -> usize {
    let mut book = self.inner().store.write();
    let cancelled = self.inner().timers.lock().cancel_all();
    book.clear_pending_marks();
    event!(Level::DEBUG, cancelled, "Pending quantity timers cancelled.");
    cancelled
  }

  /// Replaces the cart with fresh server lines. Pending timers are cancelled
  /// under the same store lock, so a change accepted concurrently either
  /// lands before the reload (and is dropped with it) or after it.
  /// Returns how many timers were cancelled.
  #[instrument(name = "QuantityReconciler::reload_lines", skip_all, fields(count = lines.len()))]
  pub fn reload_lines(&self, lines: Vec<CartLine>) -> CartResult<usize> {
    let mut book = self.inner().store.write();
    if book.is_closed() {
      return Err(CartError::SessionClosed);
    }
    let cancelled = self.inner().timers.lock().cancel_all();
    book.replace_all(lines);
    debug!(cancelled, "Cart lines reloaded.");
    Ok(cancelled)
  }

  /// Tears the reconciler down: every pending timer is cancelled, and results
  /// of requests already in flight are discarded without touching state.
  /// Idempotent.
  pub fn shutdown(&self) {
    self.inner().shutdown();
  }

  pub fn is_shut_down(&self) -> bool {
    self.inner().store.read().is_closed()
  }

  /// Number of lines with a debounce timer still running.
  pub fn pending_count(&self) -> usize {
    self.inner().timers.lock().len()
  }
}

impl Inner {
  #[instrument(name = "QuantityReconciler::shutdown", skip_all)]
  fn shutdown(&self) {
    let mut book = self.store.write();
    if book.is_closed() {
      return;
    }
    book.close();
    let cancelled = self.timers.lock().cancel_all();
    info!(cancelled, "Quantity reconciler shut down.");
  }

  async fn debounce_then_persist(self: Arc<Self>, line_id: LineId, generation: u64) {
    tokio::time::sleep(self.config.debounce).await;

    // Once the timer has claimed its arena slot nobody holds its handle any
    // more, so the request below can no longer be aborted.
    let update = {
      let mut book = self.store.write();
      if !self.timers.lock().claim(line_id, generation) {
        debug!(line_id = %line_id, generation, "Timer cancelled while waking, not persisting.");
        return;
      }
      if book.is_closed() {
        return;
      }
      let Some(entry) = book.entry_mut(line_id) else {
        debug!(line_id = %line_id, "Line removed before its timer fired.");
        return;
      };
      if entry.latest_generation != generation {
        debug!(line_id = %line_id, generation, "Timer superseded, not persisting.");
        return;
      }
      entry.debounce_pending = false;
      entry.in_flight += 1;
      entry.line.update_for(entry.line.quantity)
    };

    self.persist(line_id, generation, update).await;
  }

  #[instrument(
    name = "QuantityReconciler::persist",
    skip_all,
    fields(line_id = %line_id, generation = generation, quantity = update.quantity)
  )]
  async fn persist(&self, line_id: LineId, generation: u64, update: LineUpdate) {
    debug!("Persisting quantity.");
    let result = self.service.update_line(line_id, update).await;

    let notice = {
      let mut book = self.store.write();
      if book.is_closed() {
        debug!("Result arrived after teardown, discarded.");
        return;
      }
      let Some(entry) = book.entry_mut(line_id) else {
        debug!("Result arrived for a removed line, discarded.");
        return;
      };
      entry.in_flight = entry.in_flight.saturating_sub(1);

      match result {
        Ok(()) => {
          if generation > entry.confirmed_generation {
            entry.confirmed_generation = generation;
            entry.confirmed_quantity = update.quantity;
            // The newest change was refused and already rolled back, so the
            // server now holds this value.
            if entry.rolled_back_generation == entry.latest_generation {
              entry.line.quantity = update.quantity;
            }
          }
          info!("Quantity persisted.");
          None
        }
        Err(err) if generation == entry.latest_generation => {
          let restored = entry.confirmed_quantity;
          entry.line.quantity = restored;
          entry.rolled_back_generation = generation;
          warn!(error = %err, restored, "Persisting quantity failed, rolled back.");
          Some(err.user_message(&self.config.generic_failure_message))
        }
        Err(err) => {
          debug!(
            error = %err,
            latest_generation = entry.latest_generation,
            "Persisting quantity failed after a newer change, rollback skipped."
          );
          None
        }
      }
    };

    if let Some(message) = notice {
      self.notifier.notify(&message);
    }
  }
}
