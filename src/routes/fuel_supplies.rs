//! Fuel-supply report download.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::export;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub filename: Option<String>,
}

/// GET /api/v1/fuel-supplies/export: CSV report of all fuel supplies.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let supplies = state.upstream.fuel_supplies().await?.unwrap_or_default();
    let totals = export::supply_totals(&supplies);
    let body = export::supplies_to_csv(&supplies)?;

    let prefix = query.filename.as_deref().unwrap_or("fuel-supplies");
    let filename = export::export_filename(prefix, "csv", Utc::now().date_naive());
    tracing::info!(
        rows = supplies.len(),
        total_quantity = totals.total_quantity,
        filename = %filename,
        "Exported fuel supplies"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (
                header::HeaderName::from_static("x-total-quantity"),
                totals.total_quantity.to_string(),
            ),
            (
                header::HeaderName::from_static("x-total-cost"),
                format!("{:.2}", totals.total_cost),
            ),
        ],
        body,
    )
        .into_response())
}
