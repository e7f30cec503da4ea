//! REST endpoints for account management and active-account selection.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::commands::accounts::{CreateAccountCommand, SetActiveAccountCommand};
use crate::io::rest::error_response;
use crate::io::rest::mappers::account_mapper::AccountMapper;
use crate::AppState;
use shared::{
    AccountListResponse, AccountResponse, ActiveAccountResponse, CreateAccountRequest,
    SetActiveAccountRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/active", get(get_active_account).put(set_active_account))
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts - request: {:?}", request);

    let command = CreateAccountCommand {
        display_name: request.display_name,
        email: request.email,
    };

    match state.account_service.create_account(command).await {
        Ok(result) => {
            let response = AccountResponse {
                account: AccountMapper::to_dto(result.account),
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn list_accounts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/accounts");

    match state.account_service.list_accounts().await {
        Ok(result) => {
            let response = AccountListResponse {
                accounts: AccountMapper::to_dto_list(result.accounts),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn get_active_account(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/accounts/active");

    match state.account_service.get_active_account().await {
        Ok(account) => {
            let response = ActiveAccountResponse {
                account: account.map(AccountMapper::to_dto),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn set_active_account(
    State(state): State<AppState>,
    Json(request): Json<SetActiveAccountRequest>,
) -> impl IntoResponse {
    info!("PUT /api/accounts/active - {}", request.account_id);

    let command = SetActiveAccountCommand {
        account_id: request.account_id,
    };

    match state.account_service.set_active_account(command).await {
        Ok(result) => {
            let response = AccountResponse {
                account: AccountMapper::to_dto(result.account),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}
