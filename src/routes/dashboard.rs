//! Dashboard routes: the aggregated snapshot and its companion summaries.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::ApiResponse;
use crate::models::dashboard::{DashboardSnapshot, SalesSummary, Timeframe};
use crate::services::dashboard;
use crate::AppState;

/// GET /api/v1/dashboard: aggregated dashboard snapshot. Always succeeds.
pub async fn snapshot(State(state): State<AppState>) -> Json<ApiResponse<DashboardSnapshot>> {
    let snapshot = state.dashboard.get_dashboard_data().await;
    ApiResponse::success(snapshot)
}

/// GET /api/v1/dashboard/fuel-levels: current level per tank.
pub async fn fuel_levels(State(state): State<AppState>) -> Json<ApiResponse<HashMap<String, f64>>> {
    let levels = dashboard::get_fuel_levels(&state.upstream).await;
    ApiResponse::success(levels)
}

#[derive(Debug, Deserialize)]
pub struct SalesSummaryQuery {
    #[serde(default)]
    pub timeframe: Timeframe,
}

/// GET /api/v1/dashboard/sales-summary?timeframe=day|week|month
pub async fn sales_summary(
    State(state): State<AppState>,
    Query(query): Query<SalesSummaryQuery>,
) -> Json<ApiResponse<SalesSummary>> {
    let summary = dashboard::get_sales_summary(&state.upstream, query.timeframe).await;
    ApiResponse::success(summary)
}
