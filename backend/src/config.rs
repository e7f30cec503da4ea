//! Process configuration: defaults with environment overrides.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

use crate::domain::advisor_service::AdvisorConfig;

/// Runtime configuration for the backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub advisor: AdvisorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:budget-tracker.db".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            advisor: AdvisorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `BUDGET_TRACKER_DB`, `BUDGET_TRACKER_ADDR`,
    /// `GEMINI_API_KEY` and `GEMINI_MODEL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("BUDGET_TRACKER_DB") {
            config.database_url = url;
        }
        if let Ok(addr) = env::var("BUDGET_TRACKER_ADDR") {
            match addr.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(_) => warn!("Ignoring invalid BUDGET_TRACKER_ADDR: {}", addr),
            }
        }
        if let Ok(key) = env::var("GEMINI_API_KEY") {
            config.advisor.api_key = Some(key);
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            config.advisor.model = model;
        }
        config
    }
}
