// demos/storefront_app/src/main.rs

mod config;
mod errors;
mod scenario;
mod services;
mod state;

use crate::config::AppConfig;
use crate::services::cart_mock::SimulatedCartService;
use crate::state::StorefrontState;

use rust_decimal::Decimal;
use solecart::{AppAction, AppState, AppStore, LatestToast, ProductId, ProductSummary};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let log_json = std::env::var("STOREFRONT_LOG_JSON").map(|v| v == "true").unwrap_or(false);
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE);
  if log_json {
    subscriber.json().init();
  } else {
    subscriber.init();
  }

  tracing::info!("Starting storefront cart demo...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e.into());
    }
  };

  let fixture = match &app_config.fixture_path {
    Some(path) => Some(std::fs::read_to_string(path).map_err(errors::DemoError::from)?),
    None => None,
  };
  let cart_service = Arc::new(SimulatedCartService::from_payload(
    fixture.as_deref(),
    app_config.simulated_latency,
    app_config.refuse_above,
  )?);

  let app = AppStore::new(AppState::default());
  app.dispatch(AppAction::SetLoggedIn(true));
  app.dispatch(AppAction::AppendProducts(vec![ProductSummary {
    id: ProductId::from(1303),
    name: "BC1303 Red".to_string(),
    article_code: "BC1303".to_string(),
    price: Decimal::new(18100, 2),
  }]));

  let state = StorefrontState {
    app: app.clone(),
    cart_service,
    toast: LatestToast::new(),
    config: app_config.clone(),
  };

  let report = scenario::run_cart_visit(&state).await?;
  println!("{}", serde_json::to_string_pretty(&report)?);

  app.dispatch(AppAction::Logout);
  tracing::info!(logged_in = app.auth().logged_in, "Storefront cart demo finished.");
  Ok(())
}
