//! Sale mutation routes forwarded to the station API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::expense::DeleteOutcome;
use crate::models::sale::{CreateSale, Sale, UpdateSale};
use crate::services::sale as sale_service;
use crate::AppState;

/// POST /api/v1/sales
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSale>,
) -> Result<Json<ApiResponse<Sale>>, AppError> {
    let sale = sale_service::create(&state.upstream, &body).await?;
    Ok(ApiResponse::success(sale))
}

/// PUT /api/v1/sales/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSale>,
) -> Result<Json<ApiResponse<Sale>>, AppError> {
    let sale = sale_service::update(&state.upstream, &id, &body).await?;
    Ok(ApiResponse::success(sale))
}

/// DELETE /api/v1/sales/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteOutcome>>, AppError> {
    let outcome = sale_service::delete(&state.upstream, &id).await?;
    Ok(ApiResponse::success(outcome))
}
