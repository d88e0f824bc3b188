// solecart/src/notify.rs

//! User-visible toast notifications.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Fire-and-forget sink for single-line user messages.
pub trait Notifier: Send + Sync + 'static {
  fn notify(&self, message: &str);
}

/// Writes every toast to the log under the `toast` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, message: &str) {
    info!(target: "toast", "{}", message);
  }
}

/// Keeps only the most recent toast, which is what a toast overlay shows.
#[derive(Debug, Clone, Default)]
pub struct LatestToast {
  current: Arc<Mutex<Option<String>>>,
}

impl LatestToast {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn current(&self) -> Option<String> {
    self.current.lock().clone()
  }

  /// Clears the toast once the overlay has been dismissed.
  pub fn take(&self) -> Option<String> {
    self.current.lock().take()
  }
}

impl Notifier for LatestToast {
  fn notify(&self, message: &str) {
    info!(target: "toast", "{}", message);
    *self.current.lock() = Some(message.to_string());
  }
}
