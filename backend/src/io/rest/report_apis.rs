//! REST endpoints for derived reports, nested under a budget.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(wallet_summary))
        .route("/categories", get(category_breakdown))
        .route("/trend", get(monthly_trend))
        .route("/plan", get(plan_summary))
}

/// Query parameters for the trend endpoint.
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub months: Option<u32>,
}

pub async fn wallet_summary(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/reports/summary", budget_id);

    match state.report_service.wallet_summary(&budget_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn category_breakdown(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/reports/categories", budget_id);

    match state.report_service.category_breakdown(&budget_id).await {
        Ok(breakdown) => (StatusCode::OK, Json(breakdown)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn monthly_trend(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/budgets/{}/reports/trend - months: {:?}",
        budget_id, query.months
    );

    let today = Local::now().date_naive();
    match state
        .report_service
        .monthly_trend(&budget_id, today, query.months)
        .await
    {
        Ok(trend) => (StatusCode::OK, Json(trend)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn plan_summary(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/reports/plan", budget_id);

    match state.report_service.plan_summary(&budget_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e),
    }
}
