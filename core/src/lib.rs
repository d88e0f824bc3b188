// solecart/src/lib.rs

//! solecart: the client-side cart core of a B2B footwear storefront.
//!
//! The heart of the crate is the [`QuantityReconciler`]. Quantity taps on a
//! cart line show up at once, are persisted to the remote cart once the user
//! pauses, and are rolled back if the server refuses them:
//!  - Per-line debounce (800 ms by default); a burst becomes one request.
//!  - Optimistic writes with an explicit last-confirmed baseline per line.
//!  - Late failures never undo a newer change to the same line.
//!  - Teardown cancels every pending timer and ignores in-flight results.
//!
//! Around it sit the [`CartSession`] (paging, removal, totals), stock
//! allowance checks for the product page, and an explicit reducer-driven
//! [`AppStore`] for login and catalog state.

pub mod app_state;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod reconciler;
pub mod service;
pub mod session;
pub mod stock;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::app_state::{reduce, AppAction, AppState, AppStore, AuthState, CatalogState, ProductSummary};
pub use crate::config::ReconcilerConfig;
pub use crate::error::{CartError, CartResult};
pub use crate::model::{CartLine, CartPage, CartSummary, LineId, LineUpdate, Pagination, ProductId, SizeId};
pub use crate::notify::{LatestToast, Notifier, TracingNotifier};
pub use crate::reconciler::QuantityReconciler;
pub use crate::service::CartService;
pub use crate::session::CartSession;
pub use crate::stock::{check_add_quantity, remaining_allowance, StockNotice};
pub use crate::store::{CartStore, LinePhase, LineView};
