// solecart/src/session.rs

//! A cart session spans one cart screen: it loads the cart page by page,
//! routes quantity taps through the reconciler, removes lines and tears
//! everything down when the screen goes away.

use crate::config::ReconcilerConfig;
use crate::error::{CartError, CartResult};
use crate::model::{CartSummary, LineId};
use crate::notify::Notifier;
use crate::reconciler::QuantityReconciler;
use crate::service::CartService;
use crate::store::{CartStore, LineView};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const LOAD_FAILURE_MESSAGE: &str = "Failed to load cart";
const REMOVE_FAILURE_MESSAGE: &str = "Failed to remove item";

#[derive(Debug, Clone, Copy, Default)]
struct PageCursor {
  loaded_page: u32,
  has_more: bool,
}

pub struct CartSession {
  store: CartStore,
  reconciler: QuantityReconciler,
  service: Arc<dyn CartService>,
  notifier: Arc<dyn Notifier>,
  cursor: Mutex<PageCursor>,
}

impl CartSession {
  /// Opens an empty session. Must be called from within a Tokio runtime.
  pub fn open(
    service: Arc<dyn CartService>,
    notifier: Arc<dyn Notifier>,
    config: ReconcilerConfig,
  ) -> CartResult<Self> {
    let store = CartStore::new();
    let reconciler = QuantityReconciler::new(store.clone(), service.clone(), notifier.clone(), config)?;
    Ok(Self {
      store,
      reconciler,
      service,
      notifier,
      cursor: Mutex::new(PageCursor::default()),
    })
  }

  pub fn store(&self) -> &CartStore {
    &self.store
  }

  pub fn reconciler(&self) -> &QuantityReconciler {
    &self.reconciler
  }

  fn ensure_open(&self) -> CartResult<()> {
    if self.reconciler.is_shut_down() {
      return Err(CartError::SessionClosed);
    }
    Ok(())
  }

  /// (Re)loads the cart from page 1, replacing whatever was shown. Pending
  /// quantity timers are dropped; the fresh server values win.
  #[instrument(name = "CartSession::load_first_page", skip(self))]
  pub async fn load_first_page(&self) -> CartResult<usize> {
    self.ensure_open()?;
    let page_size = self.reconciler.config().page_size;
    let page = match self.service.fetch_cart(1, page_size).await {
      Ok(page) => page,
      Err(e) => {
        warn!(error = %e, "Fetching the cart failed.");
        self.notifier.notify(&e.user_message(LOAD_FAILURE_MESSAGE));
        return Err(e);
      }
    };
    self.ensure_open()?;

    let has_more = page.has_more();
    let count = page.lines.len();
    self.reconciler.reload_lines(page.lines)?;
    *self.cursor.lock() = PageCursor { loaded_page: 1, has_more };

    info!(count, has_more, "Cart loaded.");
    Ok(count)
  }

  /// Appends the next page. Returns `false` without calling the service when
  /// the last page has already been loaded.
  #[instrument(name = "CartSession::load_next_page", skip(self))]
  pub async fn load_next_page(&self) -> CartResult<bool> {
    self.ensure_open()?;
    let cursor = *self.cursor.lock();
    if cursor.loaded_page == 0 {
      return self.load_first_page().await.map(|_| true);
    }
    if !cursor.has_more {
      return Ok(false);
    }

    let next = cursor.loaded_page + 1;
    let page_size = self.reconciler.config().page_size;
    let page = match self.service.fetch_cart(next, page_size).await {
      Ok(page) => page,
      Err(e) => {
        warn!(error = %e, page = next, "Fetching the next cart page failed.");
        self.notifier.notify(&e.user_message(LOAD_FAILURE_MESSAGE));
        return Err(e);
      }
    };
    self.ensure_open()?;

    let has_more = page.has_more();
    self.store.write().merge_page(page.lines);
    *self.cursor.lock() = PageCursor { loaded_page: next, has_more };
    info!(page = next, has_more, "Cart page appended.");
    Ok(true)
  }

  pub fn has_more(&self) -> bool {
    self.cursor.lock().has_more
  }

  pub fn request_quantity_change(&self, line_id: LineId, new_quantity: u32) -> CartResult<()> {
    self.reconciler.request_quantity_change(line_id, new_quantity)
  }

  /// Deletes a line on the server and then locally. Its pending quantity
  /// timer is cancelled first; if the deletion fails the unsaved quantity is
  /// scheduled again.
  #[instrument(name = "CartSession::remove_line", skip_all, fields(line_id = %line_id))]
  pub async fn remove_line(&self, line_id: LineId) -> CartResult<()> {
    self.ensure_open()?;
    let line = self
      .store
      .read()
      .entry(line_id)
      .map(|e| e.line.clone())
      .ok_or(CartError::LineNotFound { line_id })?;

    let unsaved = self.reconciler.forget_line(line_id);

    match self.service.remove_line(&line).await {
      Ok(()) => {
        self.store.write().remove(line_id);
        info!("Cart line removed.");
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "Removing cart line failed.");
        self.notifier.notify(&e.user_message(REMOVE_FAILURE_MESSAGE));
        if let Some(quantity) = unsaved {
          // Best effort; a closed session or vanished line simply drops it.
          let _ = self.reconciler.request_quantity_change(line_id, quantity);
        }
        Err(e)
      }
    }
  }

  pub fn lines(&self) -> Vec<LineView> {
    self.store.snapshot()
  }

  pub fn line(&self, line_id: LineId) -> Option<LineView> {
    self.store.view(line_id)
  }

  pub fn summary(&self) -> CartSummary {
    self.store.summary()
  }

  /// Tears the session down. Also runs on drop.
  pub fn close(&self) {
    self.reconciler.shutdown();
  }

  pub fn is_closed(&self) -> bool {
    self.reconciler.is_shut_down()
  }
}

impl Drop for CartSession {
  fn drop(&mut self) {
    self.reconciler.shutdown();
  }
}
