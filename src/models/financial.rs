//! Period-aggregated financial figures computed by the station API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FinancialOverview {
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub total_sales: f64,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub total_expenses: f64,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub net_profit: f64,
}
