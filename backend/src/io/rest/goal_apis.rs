//! REST endpoints for savings goals, nested under a budget.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::commands::goals::{
    CreateGoalCommand, DeleteGoalCommand, UpdateGoalProgressCommand,
};
use crate::io::rest::error_response;
use crate::io::rest::mappers::goal_mapper::GoalMapper;
use crate::AppState;
use shared::{
    CreateGoalRequest, DeleteGoalResponse, GoalListResponse, GoalResponse,
    UpdateGoalProgressRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route(
            "/:goal_id",
            axum::routing::put(update_goal_progress).delete(delete_goal),
        )
}

pub async fn create_goal(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(request): Json<CreateGoalRequest>,
) -> impl IntoResponse {
    info!("POST /api/budgets/{}/goals - {}", budget_id, request.name);

    let command = CreateGoalCommand {
        budget_id,
        name: request.name,
        target_amount: request.target_amount,
        icon: request.icon,
        color: request.color,
        current_amount: request.current_amount,
    };

    match state.goal_service.create_goal(command).await {
        Ok(result) => {
            let response = GoalResponse {
                goal: GoalMapper::to_dto(result.goal),
                completed: result.completed,
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn list_goals(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/budgets/{}/goals", budget_id);

    match state.goal_service.list_goals(&budget_id).await {
        Ok(result) => {
            let response = GoalListResponse {
                goals: GoalMapper::to_dto_list(result.goals),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn update_goal_progress(
    State(state): State<AppState>,
    Path((budget_id, goal_id)): Path<(String, String)>,
    Json(request): Json<UpdateGoalProgressRequest>,
) -> impl IntoResponse {
    info!("PUT /api/budgets/{}/goals/{}", budget_id, goal_id);

    let command = UpdateGoalProgressCommand {
        budget_id,
        goal_id,
        current_amount: request.current_amount,
    };

    match state.goal_service.update_progress(command).await {
        Ok(result) => {
            let response = GoalResponse {
                goal: GoalMapper::to_dto(result.goal),
                completed: result.completed,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path((budget_id, goal_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}/goals/{}", budget_id, goal_id);

    let command = DeleteGoalCommand { budget_id, goal_id };

    match state.goal_service.delete_goal(command).await {
        Ok(result) => {
            let response = DeleteGoalResponse {
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}
