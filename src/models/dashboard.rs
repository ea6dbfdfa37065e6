//! Dashboard view models: the aggregated snapshot and the summary payloads.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expense::Expense;
use super::sale::Sale;
use super::tank::Tank;

/// General station statistics from the dashboard endpoint.
///
/// Only the success or failure of this call drives aggregation, so the payload
/// is kept opaque.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Period-over-period changes shown next to each headline metric.
///
/// The station API exposes no time series to derive these from; they are
/// supplied from outside the aggregator and default to zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PercentChanges {
    pub revenue: f64,
    pub fuel_sold: f64,
    pub expenses: f64,
    pub profit: f64,
    pub efficiency: f64,
}

/// Fully materialized dashboard view returned to the UI.
///
/// Every numeric field is always present; zero doubles as the empty value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub tanks: Vec<Tank>,
    pub total_sales: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub inventory_value: f64,
    pub revenue: f64,
    pub revenue_percent_change: f64,
    pub fuel_sold: f64,
    pub fuel_sold_percent_change: f64,
    pub expenses_percent_change: f64,
    pub profit: f64,
    pub profit_percent_change: f64,
    pub total_revenue: f64,
    pub revenue_change: f64,
    pub total_liters_sold: f64,
    pub sales_volume_change: f64,
    pub expenses_change: f64,
    pub efficiency_ratio: f64,
    pub efficiency_change: f64,
}

impl DashboardSnapshot {
    /// Canonical all-zero snapshot returned whenever aggregation fails.
    pub fn fallback() -> Self {
        Self::default()
    }

    /// True when every numeric field is zero and every sequence empty.
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Day,
    Week,
    Month,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}

/// Sales totals for one timeframe, broken down by fuel type and payment method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesSummary {
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub total_sales: f64,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub total_revenue: f64,
    #[serde(default)]
    pub sales_by_fuel_type: HashMap<String, f64>,
    #[serde(default)]
    pub sales_by_payment_method: HashMap<String, f64>,
    pub timeframe: Timeframe,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

impl SalesSummary {
    /// Zeroed summary for `timeframe` with both period bounds set to `now`.
    pub fn empty(timeframe: Timeframe, now: DateTime<Utc>) -> Self {
        Self {
            total_sales: 0.0,
            total_revenue: 0.0,
            sales_by_fuel_type: HashMap::new(),
            sales_by_payment_method: HashMap::new(),
            timeframe,
            period_start: now,
            period_end: now,
        }
    }
}
