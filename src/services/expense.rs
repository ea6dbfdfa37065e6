//! Expense operations forwarded to the station API.
//!
//! Validates request bodies locally so obviously bad input never reaches the
//! API, and maps absent payloads onto the error the caller expects.

use crate::errors::AppError;
use crate::models::expense::{
    CreateExpense, DeleteOutcome, Expense, ExpenseCount, ExpenseExportQuery, ExpenseFilters,
    UpdateExpense,
};
use crate::upstream::UpstreamClient;

/// List expenses matching `filters`. An absent payload is an empty list.
pub async fn list(
    client: &UpstreamClient,
    filters: &ExpenseFilters,
) -> Result<Vec<Expense>, AppError> {
    filters.validate().map_err(AppError::Validation)?;
    Ok(client.expenses(filters).await?.unwrap_or_default())
}

/// Fetch one expense by ID.
pub async fn find_by_id(client: &UpstreamClient, id: &str) -> Result<Expense, AppError> {
    client
        .expense_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expense {id} not found")))
}

pub async fn categories(client: &UpstreamClient) -> Result<Vec<String>, AppError> {
    Ok(client.expense_categories().await?.unwrap_or_default())
}

pub async fn count(client: &UpstreamClient) -> Result<ExpenseCount, AppError> {
    Ok(client.expenses_count().await?.unwrap_or_default())
}

pub async fn create(client: &UpstreamClient, body: &CreateExpense) -> Result<Expense, AppError> {
    body.validate().map_err(AppError::Validation)?;
    client
        .create_expense(body)
        .await?
        .ok_or_else(|| AppError::Upstream("expense creation returned no record".to_string()))
}

pub async fn update(
    client: &UpstreamClient,
    id: &str,
    body: &UpdateExpense,
) -> Result<Expense, AppError> {
    body.validate().map_err(AppError::Validation)?;
    client
        .update_expense(id, body)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expense {id} not found")))
}

pub async fn delete(client: &UpstreamClient, id: &str) -> Result<DeleteOutcome, AppError> {
    let outcome = client.delete_expense(id).await?.unwrap_or_default();
    if !outcome.success {
        tracing::warn!(expense_id = %id, "Expense deletion was not acknowledged");
    }
    Ok(outcome)
}

/// Expense report as rendered by the API.
pub async fn export(client: &UpstreamClient, query: &ExpenseExportQuery) -> Result<String, AppError> {
    query.validate().map_err(AppError::Validation)?;
    client.export_expenses(query).await
}
