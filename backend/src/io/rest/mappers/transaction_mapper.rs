use crate::domain::models::transaction::{
    DomainTransaction, TransactionKind as DomainTransactionKind,
};
use shared::{Transaction, TransactionKind};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn kind_to_domain(dto: TransactionKind) -> DomainTransactionKind {
        match dto {
            TransactionKind::Income => DomainTransactionKind::Income,
            TransactionKind::Expense => DomainTransactionKind::Expense,
        }
    }

    pub fn kind_to_dto(domain: DomainTransactionKind) -> TransactionKind {
        match domain {
            DomainTransactionKind::Income => TransactionKind::Income,
            DomainTransactionKind::Expense => TransactionKind::Expense,
        }
    }

    pub fn to_dto(domain: DomainTransaction) -> Transaction {
        Transaction {
            id: domain.id,
            budget_id: domain.budget_id,
            label: domain.label,
            amount: domain.amount,
            kind: Self::kind_to_dto(domain.kind),
            date: domain.date.to_string(),
            category: domain.category,
            description: domain.description,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainTransaction>) -> Vec<Transaction> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
