pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod upstream;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::dashboard::PercentChanges;
use crate::services::dashboard::{DashboardAggregator, MetricsParams};
use crate::upstream::UpstreamClient;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub dashboard: DashboardAggregator<UpstreamClient>,
    pub config: AppConfig,
}

impl AppState {
    /// Wire the upstream client and the dashboard aggregator from configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, reqwest::Error> {
        let upstream = Arc::new(UpstreamClient::new(&config)?);
        let params = MetricsParams {
            unit_price: config.fuel_unit_price,
            changes: PercentChanges::default(),
        };
        let dashboard = DashboardAggregator::new(Arc::clone(&upstream), params)
            .with_deadline(config.dashboard_deadline());

        Ok(Self {
            upstream,
            dashboard,
            config,
        })
    }
}
