//! Route definitions for the fuel-station API.

pub mod dashboard;
pub mod expenses;
pub mod fuel_supplies;
pub mod health;
pub mod sales;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = match HeaderValue::from_str(&state.config.frontend_url) {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, "Invalid FRONTEND_URL, allowing any origin");
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers(Any);

    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::snapshot))
        .route("/dashboard/fuel-levels", get(dashboard::fuel_levels))
        .route("/dashboard/sales-summary", get(dashboard::sales_summary));

    let expense_routes = Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/categories", get(expenses::categories))
        .route("/expenses/count", get(expenses::count))
        .route("/expenses/export", get(expenses::export))
        .route(
            "/expenses/{id}",
            get(expenses::get_by_id)
                .put(expenses::update)
                .delete(expenses::delete),
        );

    let sale_routes = Router::new()
        .route("/sales", post(sales::create))
        .route("/sales/{id}", put(sales::update).delete(sales::delete));

    let supply_routes =
        Router::new().route("/fuel-supplies/export", get(fuel_supplies::export_csv));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest(
            "/api/v1",
            dashboard_routes
                .merge(expense_routes)
                .merge(sale_routes)
                .merge(supply_routes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
