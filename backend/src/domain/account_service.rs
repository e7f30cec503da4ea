//! Account registry and active-account selection.
//!
//! The original application resolves the current user from a hosted
//! identity provider; here budgets still need an owner and a "who is
//! asking" answer, so accounts are a local registry with a single active
//! selection that every request acts as.

use anyhow::{anyhow, Result};
use chrono::Utc;
use tracing::info;

use crate::domain::commands::accounts::{
    AccountListResult, CreateAccountCommand, CreateAccountResult, SetActiveAccountCommand,
    SetActiveAccountResult,
};
use crate::domain::models::account::DomainAccount;
use crate::storage::{AccountRepository, DbConnection};
use shared::Account;

/// Service for managing accounts.
#[derive(Clone)]
pub struct AccountService {
    account_repository: AccountRepository,
}

impl AccountService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            account_repository: AccountRepository::new(db),
        }
    }

    /// Register a new account. The first account registered becomes active
    /// automatically.
    pub async fn create_account(&self, command: CreateAccountCommand) -> Result<CreateAccountResult> {
        info!("Creating account: {:?}", command);

        let display_name = command.display_name.trim();
        if display_name.is_empty() {
            return Err(anyhow!("Account name cannot be empty"));
        }
        let email = command.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(anyhow!("Invalid email address: {}", command.email));
        }
        if self
            .account_repository
            .get_account_by_email(&email)
            .await?
            .is_some()
        {
            return Err(anyhow!("An account already exists for {}", email));
        }

        let now = Utc::now().to_rfc3339();
        let account = DomainAccount {
            id: Account::generate_id(),
            display_name: display_name.to_string(),
            email,
            created_at: now.clone(),
            updated_at: now,
        };
        self.account_repository.store_account(&account).await?;

        if self.account_repository.get_active_account_id().await?.is_none() {
            self.account_repository.set_active_account(&account.id).await?;
            info!("Account {} set active (first account)", account.id);
        }

        Ok(CreateAccountResult {
            account,
            success_message: "Account created successfully".to_string(),
        })
    }

    pub async fn list_accounts(&self) -> Result<AccountListResult> {
        let accounts = self.account_repository.list_accounts().await?;
        Ok(AccountListResult { accounts })
    }

    /// The account every request currently acts as, if one is set.
    pub async fn get_active_account(&self) -> Result<Option<DomainAccount>> {
        match self.account_repository.get_active_account_id().await? {
            Some(id) => self.account_repository.get_account(&id).await,
            None => Ok(None),
        }
    }

    /// Like [`get_active_account`](Self::get_active_account) but an error
    /// when nothing is active; most budget operations need a caller.
    pub async fn require_active_account(&self) -> Result<DomainAccount> {
        self.get_active_account()
            .await?
            .ok_or_else(|| anyhow!("No active account found. Create or activate an account first."))
    }

    pub async fn set_active_account(
        &self,
        command: SetActiveAccountCommand,
    ) -> Result<SetActiveAccountResult> {
        info!("Setting active account: {}", command.account_id);

        self.account_repository
            .set_active_account(&command.account_id)
            .await?;
        let account = self
            .account_repository
            .get_account(&command.account_id)
            .await?
            .ok_or_else(|| anyhow!("Account not found: {}", command.account_id))?;

        Ok(SetActiveAccountResult {
            success_message: format!("Now acting as {}", account.display_name),
            account,
        })
    }
}
