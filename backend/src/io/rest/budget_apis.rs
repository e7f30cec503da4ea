//! REST endpoints for budgets: CRUD, sharing, monthly plan editing, and
//! demo seeding.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use tracing::info;

use crate::domain::commands::budgets::{
    AddExpenseLineCommand, CreateBudgetCommand, ParticipantCommand, RemoveExpenseLineCommand,
    SetSalaryCommand, UpdateBudgetCommand,
};
use crate::io::rest::error_response;
use crate::io::rest::mappers::budget_mapper::BudgetMapper;
use crate::AppState;
use shared::{
    AddExpenseLineRequest, BudgetListResponse, BudgetResponse, CreateBudgetRequest,
    DeleteBudgetResponse, DeleteExpenseLineResponse, ExpenseLineResponse,
    InviteParticipantRequest, ParticipantsResponse, SeedDemoResponse, SetSalaryRequest,
    UpdateBudgetRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route("/seed", post(seed_demo_data))
        .route("/:budget_id", put(update_budget).delete(delete_budget))
        .route("/:budget_id/invite", post(invite_participant))
        .route(
            "/:budget_id/participants/:email",
            axum::routing::delete(remove_participant),
        )
        .route("/:budget_id/plan/salary", put(set_salary))
        .route("/:budget_id/plan/lines", post(add_expense_line))
        .route(
            "/:budget_id/plan/lines/:line_id",
            axum::routing::delete(remove_expense_line),
        )
}

pub async fn create_budget(
    State(state): State<AppState>,
    Json(request): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets - request: {:?}", request.name);

    let command = CreateBudgetCommand {
        name: request.name,
        icon: request.icon,
        theme_color: request.theme_color,
        kind: BudgetMapper::kind_to_domain(request.kind),
        plan: request.plan.map(BudgetMapper::plan_to_spec),
    };

    match state.budget_service.create_budget(command).await {
        Ok(result) => {
            let response = BudgetResponse {
                budget: BudgetMapper::to_dto(result.budget),
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn list_budgets(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/budgets");

    match state.budget_service.list_budgets().await {
        Ok(result) => {
            let response = BudgetListResponse {
                budgets: BudgetMapper::to_dto_list(result.budgets),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn update_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    info!("PUT /api/budgets/{}", budget_id);

    let command = UpdateBudgetCommand {
        budget_id,
        name: request.name,
        icon: request.icon,
        theme_color: request.theme_color,
    };

    match state.budget_service.update_budget(command).await {
        Ok(result) => {
            let response = BudgetResponse {
                budget: BudgetMapper::to_dto(result.budget),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}", budget_id);

    match state.budget_service.delete_budget(&budget_id).await {
        Ok(result) => {
            let response = DeleteBudgetResponse {
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn invite_participant(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<InviteParticipantRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets/{}/invite", budget_id);

    let command = ParticipantCommand {
        budget_id,
        email: request.email,
    };

    match state.budget_service.invite_participant(command).await {
        Ok(result) => {
            let response = ParticipantsResponse {
                participants: result.participants,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn remove_participant(
    State(state): State<AppState>,
    Path((budget_id, email)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}/participants/{}", budget_id, email);

    let command = ParticipantCommand { budget_id, email };

    match state.budget_service.remove_participant(command).await {
        Ok(result) => {
            let response = ParticipantsResponse {
                participants: result.participants,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn set_salary(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<SetSalaryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/budgets/{}/plan/salary", budget_id);

    let command = SetSalaryCommand {
        budget_id,
        salary: request.salary,
    };

    match state.budget_service.set_salary(command).await {
        Ok(result) => {
            let response = BudgetResponse {
                budget: BudgetMapper::to_dto(result.budget),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn add_expense_line(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<AddExpenseLineRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets/{}/plan/lines", budget_id);

    let command = AddExpenseLineCommand {
        budget_id,
        label: request.label,
        amount: request.amount,
        kind: BudgetMapper::line_kind_to_domain(request.kind),
    };

    match state.budget_service.add_expense_line(command).await {
        Ok(result) => {
            let response = ExpenseLineResponse {
                line: BudgetMapper::line_to_dto(result.line),
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn remove_expense_line(
    State(state): State<AppState>,
    Path((budget_id, line_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}/plan/lines/{}", budget_id, line_id);

    let command = RemoveExpenseLineCommand { budget_id, line_id };

    match state.budget_service.remove_expense_line(command).await {
        Ok(result) => {
            let response = DeleteExpenseLineResponse {
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn seed_demo_data(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/budgets/seed");

    match state.budget_service.seed_demo_data().await {
        Ok(result) => {
            let response = SeedDemoResponse {
                budget_ids: result.budget_ids,
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::accounts::CreateAccountCommand;
    use crate::domain::{
        AccountService, AdvisorConfig, AdvisorService, BudgetService, ExportService, GoalService,
        RecurringService, ReportService, TransactionService,
    };
    use crate::storage::DbConnection;
    use shared::BudgetKind;

    async fn setup_test_app_state() -> AppState {
        let db = DbConnection::init_test().await.expect("init test db");

        let account_service = AccountService::new(db.clone());
        let budget_service = BudgetService::new(db.clone(), account_service.clone());
        let transaction_service = TransactionService::new(db.clone(), budget_service.clone());
        let goal_service = GoalService::new(db.clone(), budget_service.clone());
        let recurring_service = RecurringService::new(db.clone(), budget_service.clone());
        let report_service = ReportService::new(db.clone(), budget_service.clone());
        let advisor_service =
            AdvisorService::new(db.clone(), budget_service.clone(), AdvisorConfig::default());
        let export_service = ExportService::new(db, budget_service.clone());

        account_service
            .create_account(CreateAccountCommand {
                display_name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
            })
            .await
            .expect("create test account");

        AppState {
            account_service,
            budget_service,
            transaction_service,
            goal_service,
            recurring_service,
            report_service,
            advisor_service,
            export_service,
        }
    }

    fn wallet_request(name: &str) -> CreateBudgetRequest {
        CreateBudgetRequest {
            name: name.to_string(),
            icon: "💳".to_string(),
            theme_color: "blue".to_string(),
            kind: BudgetKind::Wallet,
            plan: None,
        }
    }

    #[tokio::test]
    async fn test_create_budget_returns_created() {
        let state = setup_test_app_state().await;

        let response = create_budget(State(state), Json(wallet_request("Wallet")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_budget_with_empty_name_is_bad_request() {
        let state = setup_test_app_state().await;

        let response = create_budget(State(state), Json(wallet_request("  ")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_unknown_budget_is_not_found() {
        let state = setup_test_app_state().await;

        let response = delete_budget(
            State(state),
            Path("budget::00000000-0000-0000-0000-000000000000".to_string()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_seed_then_list_returns_two_budgets() {
        let state = setup_test_app_state().await;

        let seed_response = seed_demo_data(State(state.clone())).await.into_response();
        assert_eq!(seed_response.status(), StatusCode::CREATED);

        let listed = state.budget_service.list_budgets().await.unwrap();
        assert_eq!(listed.budgets.len(), 2);
    }

    #[tokio::test]
    async fn test_set_salary_on_wallet_is_bad_request() {
        let state = setup_test_app_state().await;
        let budget = state
            .budget_service
            .create_budget(crate::domain::commands::budgets::CreateBudgetCommand {
                name: "Wallet".to_string(),
                icon: "💳".to_string(),
                theme_color: "blue".to_string(),
                kind: crate::domain::models::budget::BudgetKind::Wallet,
                plan: None,
            })
            .await
            .unwrap()
            .budget;

        let response = set_salary(
            State(state),
            Path(budget.id),
            Json(SetSalaryRequest { salary: 1000.0 }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
