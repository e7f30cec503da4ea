//! REST endpoints for recurring rules and the materialization sweep.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::domain::commands::recurring::{
    CreateRecurringRuleCommand, DeleteRecurringRuleCommand,
};
use crate::io::rest::error_response;
use crate::io::rest::mappers::recurring_mapper::RecurringMapper;
use crate::io::rest::mappers::transaction_mapper::TransactionMapper;
use crate::AppState;
use shared::{
    CreateRecurringRuleRequest, DeleteRecurringRuleResponse, ProcessRecurringResponse,
    RecurringRuleListResponse, RecurringRuleResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rules).post(create_rule))
        .route("/:rule_id", axum::routing::delete(delete_rule))
}

pub async fn create_rule(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<CreateRecurringRuleRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets/{}/recurring - {}", budget_id, request.label);

    let next_due_date = match request.next_due_date.parse::<NaiveDate>() {
        Ok(date) => date,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Invalid date: {}", request.next_due_date),
            )
                .into_response()
        }
    };

    let command = CreateRecurringRuleCommand {
        budget_id,
        label: request.label,
        amount: request.amount,
        kind: TransactionMapper::kind_to_domain(request.kind),
        category: request.category,
        frequency: RecurringMapper::frequency_to_domain(request.frequency),
        next_due_date,
    };

    match state.recurring_service.create_rule(command).await {
        Ok(result) => {
            let response = RecurringRuleResponse {
                rule: RecurringMapper::to_dto(result.rule),
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn list_rules(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/recurring", budget_id);

    match state.recurring_service.list_rules(&budget_id).await {
        Ok(result) => {
            let response = RecurringRuleListResponse {
                rules: RecurringMapper::to_dto_list(result.rules),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_rule(
    State(state): State<AppState>,
    Path((budget_id, rule_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}/recurring/{}", budget_id, rule_id);

    let command = DeleteRecurringRuleCommand { budget_id, rule_id };

    match state.recurring_service.delete_rule(command).await {
        Ok(result) => {
            let response = DeleteRecurringRuleResponse {
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Materialize due recurring transactions for the active account's budgets.
/// Mounted at `POST /api/recurring/process`.
pub async fn process_recurring(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/recurring/process");

    let today = Local::now().date_naive();
    match state.recurring_service.process_due_rules(today).await {
        Ok(result) => {
            let response = ProcessRecurringResponse {
                generated_count: result.generated_count,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}
