//! Savings goal management.
//!
//! Goals accumulate progress toward a target amount; the update that
//! reaches the target is flagged so callers can celebrate. A budget may
//! hold any number of goals.

use anyhow::{anyhow, Result};
use chrono::Utc;
use tracing::info;

use crate::domain::budget_service::BudgetService;
use crate::domain::commands::goals::{
    CreateGoalCommand, DeleteGoalCommand, DeleteGoalResult, GoalListResult, GoalResult,
    UpdateGoalProgressCommand,
};
use crate::domain::models::goal::DomainGoal;
use crate::storage::{DbConnection, GoalRepository};
use shared::SavingsGoal;

const DEFAULT_COLOR: &str = "blue";

/// Service for managing savings goals.
#[derive(Clone)]
pub struct GoalService {
    goal_repository: GoalRepository,
    budget_service: BudgetService,
}

impl GoalService {
    pub fn new(db: DbConnection, budget_service: BudgetService) -> Self {
        Self {
            goal_repository: GoalRepository::new(db),
            budget_service,
        }
    }

    pub async fn create_goal(&self, command: CreateGoalCommand) -> Result<GoalResult> {
        info!("Creating goal on budget {}: {}", command.budget_id, command.name);

        let (_, budget) = self.budget_service.member_budget(&command.budget_id).await?;

        let name = command.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Goal name cannot be empty"));
        }
        if command.target_amount <= 0.0 {
            return Err(anyhow!("Goal target amount must be positive"));
        }
        let current_amount = command.current_amount.unwrap_or(0.0);
        if current_amount < 0.0 {
            return Err(anyhow!("Goal progress cannot be negative"));
        }

        let now = Utc::now().to_rfc3339();
        let goal = DomainGoal {
            id: SavingsGoal::generate_id(),
            budget_id: budget.id,
            name: name.to_string(),
            target_amount: command.target_amount,
            current_amount,
            icon: command.icon,
            color: command.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            created_at: now.clone(),
            updated_at: now,
        };
        self.goal_repository.store_goal(&goal).await?;

        let completed = goal.is_reached();
        Ok(GoalResult {
            completed,
            success_message: "Goal created successfully".to_string(),
            goal,
        })
    }

    pub async fn list_goals(&self, budget_id: &str) -> Result<GoalListResult> {
        let (_, budget) = self.budget_service.member_budget(budget_id).await?;
        let goals = self.goal_repository.list_goals(&budget.id).await?;
        Ok(GoalListResult { goals })
    }

    /// Set a goal's accumulated progress. The result's `completed` flag is
    /// true when the new progress reaches the target.
    pub async fn update_progress(&self, command: UpdateGoalProgressCommand) -> Result<GoalResult> {
        info!(
            "Updating goal {} progress to {:.2}",
            command.goal_id, command.current_amount
        );

        let (_, budget) = self.budget_service.member_budget(&command.budget_id).await?;

        if command.current_amount < 0.0 {
            return Err(anyhow!("Goal progress cannot be negative"));
        }

        let mut goal = self
            .goal_repository
            .get_goal(&budget.id, &command.goal_id)
            .await?
            .ok_or_else(|| anyhow!("Goal not found: {}", command.goal_id))?;

        goal.current_amount = command.current_amount;
        goal.updated_at = Utc::now().to_rfc3339();
        self.goal_repository
            .update_progress(&goal.id, goal.current_amount, &goal.updated_at)
            .await?;

        let completed = goal.is_reached();
        let success_message = if completed {
            format!("Congratulations! Goal \"{}\" reached", goal.name)
        } else {
            "Goal progress updated".to_string()
        };

        Ok(GoalResult {
            completed,
            success_message,
            goal,
        })
    }

    pub async fn delete_goal(&self, command: DeleteGoalCommand) -> Result<DeleteGoalResult> {
        info!("Deleting goal {} from budget {}", command.goal_id, command.budget_id);

        let (_, budget) = self.budget_service.member_budget(&command.budget_id).await?;

        let deleted = self
            .goal_repository
            .delete_goal(&budget.id, &command.goal_id)
            .await?;
        if !deleted {
            return Err(anyhow!("Goal not found: {}", command.goal_id));
        }

        Ok(DeleteGoalResult {
            success_message: "Goal deleted successfully".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_service::AccountService;
    use crate::domain::commands::accounts::CreateAccountCommand;
    use crate::domain::commands::budgets::CreateBudgetCommand;
    use crate::domain::models::budget::BudgetKind;

    async fn setup_test() -> (GoalService, String) {
        let db = DbConnection::init_test().await.expect("init test db");
        let account_service = AccountService::new(db.clone());
        let budget_service = BudgetService::new(db.clone(), account_service.clone());
        let service = GoalService::new(db, budget_service.clone());

        account_service
            .create_account(CreateAccountCommand {
                display_name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
            })
            .await
            .expect("create account");
        let budget = budget_service
            .create_budget(CreateBudgetCommand {
                name: "Wallet".to_string(),
                icon: "💳".to_string(),
                theme_color: "blue".to_string(),
                kind: BudgetKind::Wallet,
                plan: None,
            })
            .await
            .expect("create budget")
            .budget;

        (service, budget.id)
    }

    fn create_command(budget_id: &str, name: &str, target: f64) -> CreateGoalCommand {
        CreateGoalCommand {
            budget_id: budget_id.to_string(),
            name: name.to_string(),
            target_amount: target,
            icon: "✈️".to_string(),
            color: None,
            current_amount: None,
        }
    }

    #[tokio::test]
    async fn test_create_goal_starts_at_zero() {
        let (service, budget_id) = setup_test().await;

        let result = service
            .create_goal(create_command(&budget_id, "Vacation", 2000.0))
            .await
            .unwrap();
        assert_eq!(result.goal.current_amount, 0.0);
        assert_eq!(result.goal.color, "blue");
        assert!(!result.completed);
    }

    #[tokio::test]
    async fn test_progress_update_flags_completion_once_reached() {
        let (service, budget_id) = setup_test().await;
        let goal = service
            .create_goal(create_command(&budget_id, "Vacation", 2000.0))
            .await
            .unwrap()
            .goal;

        let halfway = service
            .update_progress(UpdateGoalProgressCommand {
                budget_id: budget_id.clone(),
                goal_id: goal.id.clone(),
                current_amount: 1000.0,
            })
            .await
            .unwrap();
        assert!(!halfway.completed);
        assert_eq!(halfway.success_message, "Goal progress updated");

        let reached = service
            .update_progress(UpdateGoalProgressCommand {
                budget_id: budget_id.clone(),
                goal_id: goal.id.clone(),
                current_amount: 2000.0,
            })
            .await
            .unwrap();
        assert!(reached.completed);
        assert!(reached.success_message.contains("Congratulations"));
    }

    #[tokio::test]
    async fn test_negative_progress_is_rejected() {
        let (service, budget_id) = setup_test().await;
        let goal = service
            .create_goal(create_command(&budget_id, "Vacation", 2000.0))
            .await
            .unwrap()
            .goal;

        let result = service
            .update_progress(UpdateGoalProgressCommand {
                budget_id,
                goal_id: goal.id,
                current_amount: -5.0,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_goal_errors() {
        let (service, budget_id) = setup_test().await;

        let result = service
            .delete_goal(DeleteGoalCommand {
                budget_id,
                goal_id: "goal::00000000-0000-0000-0000-000000000000".to_string(),
            })
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_multiple_goals_per_budget_allowed() {
        let (service, budget_id) = setup_test().await;

        service
            .create_goal(create_command(&budget_id, "Vacation", 2000.0))
            .await
            .unwrap();
        service
            .create_goal(create_command(&budget_id, "New laptop", 1500.0))
            .await
            .unwrap();

        let listed = service.list_goals(&budget_id).await.unwrap();
        assert_eq!(listed.goals.len(), 2);
    }
}
