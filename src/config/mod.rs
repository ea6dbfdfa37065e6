use std::env;
use std::time::Duration;

use crate::services::dashboard::DEFAULT_UNIT_PRICE;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub upstream_timeout_secs: u64,
    pub dashboard_deadline_ms: Option<u64>,
    pub fuel_unit_price: f64,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            api_base_url: env::var("API_BASE_URL")?,
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),
            dashboard_deadline_ms: parse_deadline_ms(env::var("DASHBOARD_DEADLINE_MS").ok()),
            fuel_unit_price: parse_unit_price(env::var("FUEL_UNIT_PRICE").ok()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }

    /// Per-request timeout applied by the upstream HTTP client.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Overall deadline for one dashboard aggregation, if configured.
    pub fn dashboard_deadline(&self) -> Option<Duration> {
        self.dashboard_deadline_ms.map(Duration::from_millis)
    }
}

/// A zero or unparseable deadline means no deadline.
fn parse_deadline_ms(raw: Option<String>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
}

/// Negative, non-finite or unparseable prices fall back to the default.
fn parse_unit_price(raw: Option<String>) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p >= 0.0)
        .unwrap_or(DEFAULT_UNIT_PRICE)
}
