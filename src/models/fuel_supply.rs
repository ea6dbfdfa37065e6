//! Fuel deliveries received from providers.

use serde::{Deserialize, Serialize};

/// Provider reference embedded in a supply record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderRef {
    #[serde(default)]
    pub name: String,
}

/// Tank reference embedded in a supply record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TankRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fuel_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FuelSupply {
    pub id: String,
    /// ISO-8601 date or timestamp as sent by the API.
    pub delivery_date: String,
    #[serde(default)]
    pub provider: Option<ProviderRef>,
    #[serde(default)]
    pub tank: Option<TankRef>,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub quantity_liters: f64,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub price_per_liter: f64,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub total_cost: f64,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}
