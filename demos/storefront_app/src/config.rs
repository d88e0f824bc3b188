// demos/storefront_app/src/config.rs

use crate::errors::{DemoError, Result};
use dotenvy::dotenv;
use solecart::ReconcilerConfig;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub reconciler: ReconcilerConfig,

  // Simulated cart service
  pub simulated_latency: Duration,
  /// Quantities above this are refused by the simulated service. `0` in the
  /// environment turns the refusal off.
  pub refuse_above: Option<u32>,
  /// Cart payload to seed the simulated service with; the bundled fixture
  /// when unset.
  pub fixture_path: Option<String>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| DemoError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let reconciler = ReconcilerConfig::from_env()?;

    let simulated_latency = get_env("STOREFRONT_LATENCY_MS")
      .unwrap_or_else(|_| "150".to_string())
      .parse::<u64>()
      .map(Duration::from_millis)
      .map_err(|e| DemoError::Config(format!("Invalid STOREFRONT_LATENCY_MS: {}", e)))?;

    let refuse_above = get_env("STOREFRONT_REFUSE_ABOVE")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map(|limit| (limit > 0).then_some(limit))
      .map_err(|e| DemoError::Config(format!("Invalid STOREFRONT_REFUSE_ABOVE: {}", e)))?;

    let fixture_path = get_env("STOREFRONT_CART_FIXTURE").ok();

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      reconciler,
      simulated_latency,
      refuse_above,
      fixture_path,
    })
  }
}
