//! HTTP client for the remote station API.
//!
//! Every endpoint answers with the `{data, error}` envelope; the client decodes
//! it and hands back `Ok(None)` when `data` is absent so callers decide what an
//! absent payload means.

use std::collections::HashMap;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::errors::{ApiResponse, AppError};
use crate::models::dashboard::{DashboardStats, SalesSummary, Timeframe};
use crate::models::expense::{
    CreateExpense, DeleteOutcome, Expense, ExpenseCount, ExpenseExportQuery, ExpenseFilters,
    UpdateExpense,
};
use crate::models::financial::FinancialOverview;
use crate::models::fuel_supply::FuelSupply;
use crate::models::sale::{CreateSale, Sale, UpdateSale};
use crate::models::tank::Tank;
use crate::services::dashboard::DashboardSource;

/// Endpoint stems relative to the API base URL.
pub mod endpoints {
    pub const DASHBOARD: &str = "dashboard";
    pub const FUEL_LEVELS: &str = "dashboard/fuel-levels";
    pub const SALES_SUMMARY: &str = "dashboard/sales-summary";
    pub const FINANCIAL_OVERVIEW: &str = "financials/overview";
    pub const TANKS: &str = "tanks";
    pub const SALES: &str = "sales";
    pub const EXPENSES: &str = "expenses";
    pub const FUEL_SUPPLIES: &str = "fuel-supplies";
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fuelstation/", env!("CARGO_PKG_VERSION")))
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode the envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, AppError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_envelope(status, &body)
    }

    /// Send a request whose payload is a text document, either wrapped in the
    /// envelope or returned as the raw body.
    async fn send_text(&self, request: RequestBuilder) -> Result<String, AppError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return match decode_envelope::<String>(status, &body) {
                Err(e) => Err(e),
                Ok(_) => Err(AppError::Upstream(format!("HTTP {status}"))),
            };
        }
        if let Ok(ApiResponse {
            data: Some(text), ..
        }) = serde_json::from_slice::<ApiResponse<String>>(&body)
        {
            return Ok(text);
        }
        String::from_utf8(body.to_vec())
            .map_err(|e| AppError::Upstream(format!("export body is not UTF-8: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        self.send(self.http.get(self.endpoint(path))).await
    }

    /// Check that the API answers at all; any HTTP status counts as reachable.
    pub async fn ping(&self) -> Result<StatusCode, AppError> {
        let response = self.http.get(self.endpoint(endpoints::DASHBOARD)).send().await?;
        Ok(response.status())
    }

    pub async fn fuel_levels(&self) -> Result<Option<HashMap<String, f64>>, AppError> {
        self.get(endpoints::FUEL_LEVELS).await
    }

    pub async fn sales_summary(
        &self,
        timeframe: Timeframe,
    ) -> Result<Option<SalesSummary>, AppError> {
        let request = self
            .http
            .get(self.endpoint(endpoints::SALES_SUMMARY))
            .query(&[("timeframe", timeframe.as_str())]);
        self.send(request).await
    }

    pub async fn expenses(&self, filters: &ExpenseFilters) -> Result<Option<Vec<Expense>>, AppError> {
        let request = self
            .http
            .get(self.endpoint(endpoints::EXPENSES))
            .query(filters);
        self.send(request).await
    }

    pub async fn expense_by_id(&self, id: &str) -> Result<Option<Expense>, AppError> {
        self.get(&format!("{}/{id}", endpoints::EXPENSES)).await
    }

    pub async fn expense_categories(&self) -> Result<Option<Vec<String>>, AppError> {
        self.get(&format!("{}/categories", endpoints::EXPENSES)).await
    }

    pub async fn expenses_count(&self) -> Result<Option<ExpenseCount>, AppError> {
        self.get(&format!("{}/count", endpoints::EXPENSES)).await
    }

    pub async fn create_expense(&self, body: &CreateExpense) -> Result<Option<Expense>, AppError> {
        let request = self.http.post(self.endpoint(endpoints::EXPENSES)).json(body);
        self.send(request).await
    }

    pub async fn update_expense(
        &self,
        id: &str,
        body: &UpdateExpense,
    ) -> Result<Option<Expense>, AppError> {
        let request = self
            .http
            .put(self.endpoint(&format!("{}/{id}", endpoints::EXPENSES)))
            .json(body);
        self.send(request).await
    }

    pub async fn delete_expense(&self, id: &str) -> Result<Option<DeleteOutcome>, AppError> {
        let request = self
            .http
            .delete(self.endpoint(&format!("{}/{id}", endpoints::EXPENSES)));
        self.send(request).await
    }

    /// Expense report rendered by the API in the requested format.
    pub async fn export_expenses(&self, query: &ExpenseExportQuery) -> Result<String, AppError> {
        let request = self
            .http
            .get(self.endpoint(&format!("{}/export", endpoints::EXPENSES)))
            .query(query);
        self.send_text(request).await
    }

    pub async fn create_sale(&self, body: &CreateSale) -> Result<Option<Sale>, AppError> {
        let request = self.http.post(self.endpoint(endpoints::SALES)).json(body);
        self.send(request).await
    }

    pub async fn update_sale(&self, id: &str, body: &UpdateSale) -> Result<Option<Sale>, AppError> {
        let request = self
            .http
            .put(self.endpoint(&format!("{}/{id}", endpoints::SALES)))
            .json(body);
        self.send(request).await
    }

    pub async fn delete_sale(&self, id: &str) -> Result<Option<DeleteOutcome>, AppError> {
        let request = self
            .http
            .delete(self.endpoint(&format!("{}/{id}", endpoints::SALES)));
        self.send(request).await
    }

    pub async fn fuel_supplies(&self) -> Result<Option<Vec<FuelSupply>>, AppError> {
        self.get(endpoints::FUEL_SUPPLIES).await
    }
}

/// Interpret an upstream body. A non-2xx status is always an error: the
/// envelope's message when it carries one, the status line otherwise.
fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<T>, AppError> {
    match serde_json::from_slice::<ApiResponse<T>>(body) {
        Ok(envelope) if status.is_success() => envelope.into_data(),
        Ok(ApiResponse {
            error: Some(err), ..
        }) => Err(AppError::Upstream(err.message)),
        Ok(_) => Err(AppError::Upstream(format!("HTTP {status}"))),
        Err(e) if status.is_success() => Err(AppError::Upstream(format!(
            "malformed response body: {e}"
        ))),
        Err(_) => Err(AppError::Upstream(format!("HTTP {status}"))),
    }
}

impl DashboardSource for UpstreamClient {
    async fn fetch_dashboard_stats(&self) -> Result<Option<DashboardStats>, AppError> {
        self.get(endpoints::DASHBOARD).await
    }

    async fn fetch_financial_overview(&self) -> Result<Option<FinancialOverview>, AppError> {
        self.get(endpoints::FINANCIAL_OVERVIEW).await
    }

    async fn fetch_tanks(&self) -> Result<Option<Vec<Tank>>, AppError> {
        self.get(endpoints::TANKS).await
    }

    async fn fetch_sales(&self) -> Result<Option<Vec<Sale>>, AppError> {
        self.get(endpoints::SALES).await
    }
}
