// demos/storefront_app/src/state.rs
use crate::config::AppConfig;
use crate::services::cart_mock::SimulatedCartService;
use solecart::{AppStore, LatestToast};
use std::sync::Arc;

/// Everything a screen needs, passed explicitly.
#[derive(Clone)]
pub struct StorefrontState {
  pub app: AppStore,
  pub cart_service: Arc<SimulatedCartService>,
  pub toast: LatestToast,
  pub config: Arc<AppConfig>,
}
