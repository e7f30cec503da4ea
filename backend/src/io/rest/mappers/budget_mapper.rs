use crate::domain::commands::budgets::{ExpenseLineSpec, MonthlyPlanSpec};
use crate::domain::models::budget::{
    BudgetKind as DomainBudgetKind, DomainBudget, DomainExpenseLine,
    ExpenseLineKind as DomainExpenseLineKind,
};
use shared::{Budget, BudgetKind, ExpenseLine, ExpenseLineKind, MonthlyPlanInit};

pub struct BudgetMapper;

impl BudgetMapper {
    pub fn kind_to_domain(dto: BudgetKind) -> DomainBudgetKind {
        match dto {
            BudgetKind::Wallet => DomainBudgetKind::Wallet,
            BudgetKind::Monthly => DomainBudgetKind::Monthly,
        }
    }

    pub fn kind_to_dto(domain: DomainBudgetKind) -> BudgetKind {
        match domain {
            DomainBudgetKind::Wallet => BudgetKind::Wallet,
            DomainBudgetKind::Monthly => BudgetKind::Monthly,
        }
    }

    pub fn line_kind_to_domain(dto: ExpenseLineKind) -> DomainExpenseLineKind {
        match dto {
            ExpenseLineKind::Fixed => DomainExpenseLineKind::Fixed,
            ExpenseLineKind::Variable => DomainExpenseLineKind::Variable,
        }
    }

    pub fn line_kind_to_dto(domain: DomainExpenseLineKind) -> ExpenseLineKind {
        match domain {
            DomainExpenseLineKind::Fixed => ExpenseLineKind::Fixed,
            DomainExpenseLineKind::Variable => ExpenseLineKind::Variable,
        }
    }

    pub fn to_dto(domain: DomainBudget) -> Budget {
        Budget {
            id: domain.id,
            owner_id: domain.owner_id,
            name: domain.name,
            icon: domain.icon,
            theme_color: domain.theme_color,
            kind: Self::kind_to_dto(domain.kind),
            salary: domain.salary,
            participants: domain.participants,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainBudget>) -> Vec<Budget> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn line_to_dto(domain: DomainExpenseLine) -> ExpenseLine {
        ExpenseLine {
            id: domain.id,
            budget_id: domain.budget_id,
            label: domain.label,
            amount: domain.amount,
            kind: Self::line_kind_to_dto(domain.kind),
        }
    }

    pub fn line_to_dto_list(domain: Vec<DomainExpenseLine>) -> Vec<ExpenseLine> {
        domain.into_iter().map(Self::line_to_dto).collect()
    }

    pub fn plan_to_spec(dto: MonthlyPlanInit) -> MonthlyPlanSpec {
        MonthlyPlanSpec {
            salary: dto.salary,
            fixed: dto
                .fixed
                .into_iter()
                .map(|l| ExpenseLineSpec {
                    label: l.label,
                    amount: l.amount,
                })
                .collect(),
            variable: dto
                .variable
                .into_iter()
                .map(|l| ExpenseLineSpec {
                    label: l.label,
                    amount: l.amount,
                })
                .collect(),
        }
    }
}
