//! Fuel sale transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fuel sale transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub id: String,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub quantity_liters: f64,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub amount: f64,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub price_per_liter: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for recording a sale at a filling system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSale {
    pub filling_system_id: String,
    pub quantity: f64,
    pub price_per_liter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl CreateSale {
    pub fn validate(&self) -> Result<(), String> {
        if self.filling_system_id.trim().is_empty() {
            return Err("filling_system_id is required".to_string());
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err("quantity must be greater than zero".to_string());
        }
        if !self.price_per_liter.is_finite() || self.price_per_liter < 0.0 {
            return Err("price_per_liter must be a non-negative number".to_string());
        }
        if self.total_price.is_some_and(|t| !t.is_finite() || t < 0.0) {
            return Err("total_price must be a non-negative number".to_string());
        }
        Ok(())
    }
}

/// Partial sale update; the API adjusts the tank level accordingly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filling_system_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_liter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl UpdateSale {
    pub fn validate(&self) -> Result<(), String> {
        if self.quantity.is_some_and(|q| !q.is_finite() || q <= 0.0) {
            return Err("quantity must be greater than zero".to_string());
        }
        for (field, value) in [
            ("price_per_liter", self.price_per_liter),
            ("total_price", self.total_price),
        ] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(format!("{field} must be a non-negative number"));
            }
        }
        Ok(())
    }
}
