use crate::domain::models::goal::DomainGoal;
use shared::SavingsGoal;

pub struct GoalMapper;

impl GoalMapper {
    pub fn to_dto(domain: DomainGoal) -> SavingsGoal {
        SavingsGoal {
            id: domain.id,
            budget_id: domain.budget_id,
            name: domain.name,
            target_amount: domain.target_amount,
            current_amount: domain.current_amount,
            icon: domain.icon,
            color: domain.color,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainGoal>) -> Vec<SavingsGoal> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
