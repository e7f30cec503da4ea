/// An account that can own budgets and participate in shared ones.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainAccount {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}
