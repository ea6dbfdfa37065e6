//! Sale mutations forwarded to the station API.
//!
//! The API restores or adjusts tank levels itself; this layer only validates
//! the request and maps absent payloads.

use crate::errors::AppError;
use crate::models::expense::DeleteOutcome;
use crate::models::sale::{CreateSale, Sale, UpdateSale};
use crate::upstream::UpstreamClient;

pub async fn create(client: &UpstreamClient, body: &CreateSale) -> Result<Sale, AppError> {
    body.validate().map_err(AppError::Validation)?;
    client
        .create_sale(body)
        .await?
        .ok_or_else(|| AppError::Upstream("sale creation returned no record".to_string()))
}

pub async fn update(client: &UpstreamClient, id: &str, body: &UpdateSale) -> Result<Sale, AppError> {
    body.validate().map_err(AppError::Validation)?;
    client
        .update_sale(id, body)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sale {id} not found")))
}

pub async fn delete(client: &UpstreamClient, id: &str) -> Result<DeleteOutcome, AppError> {
    let outcome = client.delete_sale(id).await?.unwrap_or_default();
    if !outcome.success {
        tracing::warn!(sale_id = %id, "Sale deletion was not acknowledged");
    }
    Ok(outcome)
}
