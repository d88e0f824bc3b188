// solecart/src/app_state.rs

//! Session-wide application state (login status and the product catalog
//! listing), updated only through pure reducer functions and handed to
//! screens explicitly through an `AppStore`.

use crate::model::ProductId;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
  pub logged_in: bool,
  pub guest_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
  pub id: ProductId,
  pub name: String,
  #[serde(default)]
  pub article_code: String,
  pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
  pub products: Vec<ProductSummary>,
  pub page: u32,
  pub has_more: bool,
  pub filter_loading: bool,
}

impl Default for CatalogState {
  fn default() -> Self {
    Self {
      products: Vec::new(),
      page: 1,
      has_more: true,
      filter_loading: false,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
  pub auth: AuthState,
  pub catalog: CatalogState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
  SetLoggedIn(bool),
  SetGuestUser(bool),
  Logout,
  AppendProducts(Vec<ProductSummary>),
  SetFilterLoading(bool),
  IncrementPage,
  SetHasMore(bool),
  ResetProducts,
}

pub fn reduce_auth(state: &AuthState, action: &AppAction) -> AuthState {
  match action {
    AppAction::SetLoggedIn(logged_in) => AuthState {
      logged_in: *logged_in,
      ..state.clone()
    },
    AppAction::SetGuestUser(guest_user) => AuthState {
      guest_user: *guest_user,
      ..state.clone()
    },
    AppAction::Logout => AuthState::default(),
    _ => state.clone(),
  }
}

pub fn reduce_catalog(state: &CatalogState, action: &AppAction) -> CatalogState {
  let mut next = state.clone();
  match action {
    AppAction::AppendProducts(products) => next.products.extend(products.iter().cloned()),
    AppAction::SetFilterLoading(loading) => next.filter_loading = *loading,
    AppAction::IncrementPage => next.page += 1,
    AppAction::SetHasMore(has_more) => next.has_more = *has_more,
    AppAction::ResetProducts => {
      next.products.clear();
      next.page = 1;
      next.has_more = true;
    }
    AppAction::SetLoggedIn(_) | AppAction::SetGuestUser(_) | AppAction::Logout => {}
  }
  next
}

/// Applies `action` to `state`, producing the next state.
pub fn reduce(state: &AppState, action: AppAction) -> AppState {
  AppState {
    auth: reduce_auth(&state.auth, &action),
    catalog: reduce_catalog(&state.catalog, &action),
  }
}

/// Cloneable handle shared by the screens of one app session.
#[derive(Debug, Clone, Default)]
pub struct AppStore(Arc<RwLock<AppState>>);

impl AppStore {
  pub fn new(initial: AppState) -> Self {
    AppStore(Arc::new(RwLock::new(initial)))
  }

  pub fn dispatch(&self, action: AppAction) {
    trace!(?action, "Dispatching app action.");
    let mut guard = self.0.write();
    *guard = reduce(&guard, action);
  }

  pub fn snapshot(&self) -> AppState {
    self.0.read().clone()
  }

  pub fn auth(&self) -> AuthState {
    self.0.read().auth.clone()
  }
}
