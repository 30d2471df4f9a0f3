//! Dashboard and report routes.

use crate::{
    core::report::{self, DashboardStats, ProductSummary, RevenueReport},
    errors::Result,
    web::{AppState, session::CurrentUser},
};
use axum::{Json, Router, extract::State, routing::get};

/// Dashboard and report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/reports/revenue", get(revenue))
        .route("/reports/products", get(products))
}

async fn dashboard(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<DashboardStats>> {
    Ok(Json(report::dashboard(&state.db).await?))
}

async fn revenue(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<RevenueReport>> {
    Ok(Json(report::revenue_report(&state.db).await?))
}

async fn products(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<ProductSummary>>> {
    Ok(Json(report::product_summary(&state.db).await?))
}
