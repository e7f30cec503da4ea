use crate::domain::models::recurring::{DomainRecurringRule, Frequency as DomainFrequency};
use crate::io::rest::mappers::transaction_mapper::TransactionMapper;
use shared::{Frequency, RecurringRule};

pub struct RecurringMapper;

impl RecurringMapper {
    pub fn frequency_to_domain(dto: Frequency) -> DomainFrequency {
        match dto {
            Frequency::Weekly => DomainFrequency::Weekly,
            Frequency::Monthly => DomainFrequency::Monthly,
            Frequency::Yearly => DomainFrequency::Yearly,
        }
    }

    pub fn frequency_to_dto(domain: DomainFrequency) -> Frequency {
        match domain {
            DomainFrequency::Weekly => Frequency::Weekly,
            DomainFrequency::Monthly => Frequency::Monthly,
            DomainFrequency::Yearly => Frequency::Yearly,
        }
    }

    pub fn to_dto(domain: DomainRecurringRule) -> RecurringRule {
        RecurringRule {
            id: domain.id,
            budget_id: domain.budget_id,
            label: domain.label,
            amount: domain.amount,
            kind: TransactionMapper::kind_to_dto(domain.kind),
            category: domain.category,
            frequency: Self::frequency_to_dto(domain.frequency),
            next_due_date: domain.next_due_date.to_string(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainRecurringRule>) -> Vec<RecurringRule> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
