use crate::domain::models::account::DomainAccount;
use shared::Account;

pub struct AccountMapper;

impl AccountMapper {
    pub fn to_dto(domain: DomainAccount) -> Account {
        Account {
            id: domain.id,
            display_name: domain.display_name,
            email: domain.email,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainAccount>) -> Vec<Account> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
