//! REST endpoints for budget export, nested under a budget.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::io::rest::error_response;
use crate::io::rest::mappers::budget_mapper::BudgetMapper;
use crate::io::rest::mappers::goal_mapper::GoalMapper;
use crate::io::rest::mappers::recurring_mapper::RecurringMapper;
use crate::io::rest::mappers::transaction_mapper::TransactionMapper;
use crate::AppState;
use shared::BudgetExport;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/json", get(export_json))
        .route("/csv", get(export_csv))
}

pub async fn export_json(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/export/json", budget_id);

    let bundle = match state.export_service.export_bundle(&budget_id).await {
        Ok(bundle) => bundle,
        Err(e) => return error_response(e),
    };

    let document = BudgetExport {
        budget: BudgetMapper::to_dto(bundle.budget),
        expense_lines: BudgetMapper::line_to_dto_list(bundle.expense_lines),
        transactions: TransactionMapper::to_dto_list(bundle.transactions),
        goals: GoalMapper::to_dto_list(bundle.goals),
        recurring: RecurringMapper::to_dto_list(bundle.recurring),
        exported_at: bundle.exported_at,
    };

    match serde_json::to_string_pretty(&document) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize export: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize export").into_response()
        }
    }
}

pub async fn export_csv(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/export/csv", budget_id);

    match state.export_service.transactions_csv(&budget_id).await {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/csv")], body).into_response(),
        Err(e) => error_response(e),
    }
}
