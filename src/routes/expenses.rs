//! Expense routes forwarded to the station API.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::errors::{ApiResponse, AppError};
use crate::models::expense::{
    CreateExpense, DeleteOutcome, Expense, ExpenseCount, ExpenseExportQuery, ExpenseFilters,
    UpdateExpense,
};
use crate::services::{expense as expense_service, export as export_service};
use crate::AppState;

/// GET /api/v1/expenses: list expenses with optional filters.
pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<ExpenseFilters>,
) -> Result<Json<ApiResponse<Vec<Expense>>>, AppError> {
    let expenses = expense_service::list(&state.upstream, &filters).await?;
    Ok(ApiResponse::success(expenses))
}

/// POST /api/v1/expenses
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateExpense>,
) -> Result<Json<ApiResponse<Expense>>, AppError> {
    let expense = expense_service::create(&state.upstream, &body).await?;
    Ok(ApiResponse::success(expense))
}

/// GET /api/v1/expenses/categories
pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let categories = expense_service::categories(&state.upstream).await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/v1/expenses/count
pub async fn count(State(state): State<AppState>) -> Result<Json<ApiResponse<ExpenseCount>>, AppError> {
    let count = expense_service::count(&state.upstream).await?;
    Ok(ApiResponse::success(count))
}

/// GET /api/v1/expenses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Expense>>, AppError> {
    let expense = expense_service::find_by_id(&state.upstream, &id).await?;
    Ok(ApiResponse::success(expense))
}

/// PUT /api/v1/expenses/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateExpense>,
) -> Result<Json<ApiResponse<Expense>>, AppError> {
    let expense = expense_service::update(&state.upstream, &id, &body).await?;
    Ok(ApiResponse::success(expense))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteOutcome>>, AppError> {
    let outcome = expense_service::delete(&state.upstream, &id).await?;
    Ok(ApiResponse::success(outcome))
}

/// GET /api/v1/expenses/export?startDate=&endDate=&format=csv|json&category=
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ExpenseExportQuery>,
) -> Result<Response, AppError> {
    let body = expense_service::export(&state.upstream, &query).await?;
    let filename =
        export_service::export_filename("expenses", query.format.extension(), Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, query.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
