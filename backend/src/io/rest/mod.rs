//! REST interface layer.
//!
//! One router per resource, assembled under `/api`. Handlers translate the
//! public DTOs from the `shared` crate into domain commands and map domain
//! errors onto HTTP status codes by their message; no business logic lives
//! here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::error;

use crate::AppState;

pub mod account_apis;
pub mod advisor_apis;
pub mod budget_apis;
pub mod export_apis;
pub mod goal_apis;
pub mod mappers;
pub mod recurring_apis;
pub mod report_apis;
pub mod transaction_apis;

/// Assemble the full `/api` router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/accounts", account_apis::router())
        .nest("/api/budgets", budget_apis::router())
        .nest(
            "/api/budgets/:budget_id/transactions",
            transaction_apis::router(),
        )
        .nest("/api/budgets/:budget_id/goals", goal_apis::router())
        .nest("/api/budgets/:budget_id/recurring", recurring_apis::router())
        .nest("/api/budgets/:budget_id/reports", report_apis::router())
        .nest("/api/budgets/:budget_id/advisor", advisor_apis::router())
        .nest("/api/budgets/:budget_id/export", export_apis::router())
        .route(
            "/api/recurring/process",
            post(recurring_apis::process_recurring),
        )
}

/// Map a domain error onto an HTTP status code by its message.
pub(crate) fn error_status(err: &anyhow::Error) -> StatusCode {
    let message = err.to_string().to_lowercase();
    if message.contains("not found") {
        StatusCode::NOT_FOUND
    } else if message.contains("only the owner") || message.contains("access denied") {
        StatusCode::FORBIDDEN
    } else if message.contains("not configured") {
        StatusCode::SERVICE_UNAVAILABLE
    } else if message.contains("already") || message.contains("limit") {
        StatusCode::CONFLICT
    } else if message.contains("cannot be")
        || message.contains("must be")
        || message.contains("invalid")
        || message.contains("is not a monthly")
    {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Standard error response: domain message as the body, status from
/// [`error_status`]. Unexpected errors are logged before being returned.
pub(crate) fn error_response(err: anyhow::Error) -> Response {
    let status = error_status(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Unhandled domain error: {:?}", err);
    }
    (status, err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&anyhow!("Budget not found: budget::x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&anyhow!("No active account found. Create or activate an account first.")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&anyhow!("Only the owner can manage budget budget::x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_status(&anyhow!("Access denied: budget budget::x is not shared with a@b.c")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_status(&anyhow!("Budget limit of 10 reached. Delete one first.")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&anyhow!("sam@example.com is already a participant")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&anyhow!("Amount must be positive")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&anyhow!("Budget budget::x is not a monthly budget")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&anyhow!("Advisor is not configured: missing API key")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error_status(&anyhow!("database is locked")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
