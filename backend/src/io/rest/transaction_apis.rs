//! REST endpoints for transactions, nested under a budget.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use tracing::info;

use crate::domain::commands::recurring::CreateRecurringRuleCommand;
use crate::domain::commands::transactions::{
    CreateTransactionCommand, DeleteTransactionCommand, TransactionListQuery,
};
use crate::io::rest::error_response;
use crate::io::rest::mappers::recurring_mapper::RecurringMapper;
use crate::io::rest::mappers::transaction_mapper::TransactionMapper;
use crate::AppState;
use shared::{
    CreateTransactionRequest, DeleteTransactionResponse, TransactionListRequest,
    TransactionListResponse, TransactionResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:transaction_id", axum::routing::delete(delete_transaction))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets/{}/transactions - {}", budget_id, request.label);

    let date = match request.date.parse::<NaiveDate>() {
        Ok(date) => date,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Invalid date: {}", request.date),
            )
                .into_response()
        }
    };

    let command = CreateTransactionCommand {
        budget_id: budget_id.clone(),
        label: request.label,
        amount: request.amount,
        kind: TransactionMapper::kind_to_domain(request.kind),
        date,
        category: request.category,
        description: request.description,
    };

    let transaction = match state.transaction_service.create_transaction(command).await {
        Ok(transaction) => transaction,
        Err(e) => return error_response(e),
    };

    // Optionally register the matching recurring rule, first due one
    // cadence step after the transaction date.
    let mut recurring_rule = None;
    if let Some(frequency) = request.recurring {
        let frequency = RecurringMapper::frequency_to_domain(frequency);
        let command = CreateRecurringRuleCommand {
            budget_id,
            label: transaction.label.clone(),
            amount: transaction.amount,
            kind: transaction.kind,
            category: Some(transaction.category.clone()),
            frequency,
            next_due_date: frequency.advance(transaction.date),
        };
        match state.recurring_service.create_rule(command).await {
            Ok(result) => recurring_rule = Some(RecurringMapper::to_dto(result.rule)),
            Err(e) => return error_response(e),
        }
    }

    let success_message = if recurring_rule.is_some() {
        "Transaction added and recurrence scheduled".to_string()
    } else {
        "Transaction added".to_string()
    };
    let response = TransactionResponse {
        transaction: TransactionMapper::to_dto(transaction),
        recurring_rule,
        success_message,
    };
    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Query(query): Query<TransactionListRequest>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/transactions - query: {:?}", budget_id, query);

    let parse = |value: Option<String>| -> Result<Option<NaiveDate>, String> {
        match value {
            Some(s) => s
                .parse::<NaiveDate>()
                .map(Some)
                .map_err(|_| format!("Invalid date: {}", s)),
            None => Ok(None),
        }
    };
    let (start_date, end_date) = match (parse(query.start_date), parse(query.end_date)) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(message), _) | (_, Err(message)) => {
            return (StatusCode::BAD_REQUEST, message).into_response()
        }
    };

    let query = TransactionListQuery {
        budget_id,
        start_date,
        end_date,
    };

    match state.transaction_service.list_transactions(query).await {
        Ok(result) => {
            let response = TransactionListResponse {
                transactions: TransactionMapper::to_dto_list(result.transactions),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path((budget_id, transaction_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}/transactions/{}", budget_id, transaction_id);

    let command = DeleteTransactionCommand {
        budget_id,
        transaction_id,
    };

    match state.transaction_service.delete_transaction(command).await {
        Ok(result) => {
            let status = if result.deleted {
                StatusCode::OK
            } else {
                StatusCode::NOT_FOUND
            };
            let response = DeleteTransactionResponse {
                deleted: result.deleted,
                success_message: result.success_message,
            };
            (status, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}
