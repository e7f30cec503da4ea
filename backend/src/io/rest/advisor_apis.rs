//! REST endpoints for the AI advisor, nested under a budget.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;
use shared::AdvisorAskRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask))
        .route("/analyze", post(analyze))
}

pub async fn ask(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<AdvisorAskRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets/{}/advisor/ask", budget_id);

    match state.advisor_service.ask(&budget_id, &request.question).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/budgets/{}/advisor/analyze", budget_id);

    match state.advisor_service.analyze(&budget_id).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => error_response(e),
    }
}
