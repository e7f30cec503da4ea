//! Budget tracker backend.
//!
//! Layered as io (REST) → domain (services) → storage (SQLite
//! repositories), with the public DTOs living in the `shared` crate. The
//! backend is UI-agnostic: any client that speaks the `/api` surface works.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    AccountService, AdvisorService, BudgetService, ExportService, GoalService, RecurringService,
    ReportService, TransactionService,
};
use crate::storage::DbConnection;

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub budget_service: BudgetService,
    pub transaction_service: TransactionService,
    pub goal_service: GoalService,
    pub recurring_service: RecurringService,
    pub report_service: ReportService,
    pub advisor_service: AdvisorService,
    pub export_service: ExportService,
}

/// Initialize the backend with all required services.
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain services");
    let account_service = AccountService::new(db.clone());
    let budget_service = BudgetService::new(db.clone(), account_service.clone());
    let transaction_service = TransactionService::new(db.clone(), budget_service.clone());
    let goal_service = GoalService::new(db.clone(), budget_service.clone());
    let recurring_service = RecurringService::new(db.clone(), budget_service.clone());
    let report_service = ReportService::new(db.clone(), budget_service.clone());
    let advisor_service =
        AdvisorService::new(db.clone(), budget_service.clone(), config.advisor.clone());
    let export_service = ExportService::new(db, budget_service.clone());

    Ok(AppState {
        account_service,
        budget_service,
        transaction_service,
        goal_service,
        recurring_service,
        report_service,
        advisor_service,
        export_service,
    })
}

/// Build the application router with CORS applied.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    io::rest::api_router().layer(cors).with_state(state)
}
