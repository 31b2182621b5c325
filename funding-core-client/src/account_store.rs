use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use funding_core_api::domain::account::{
    AccountProfile, AccountType, ProfileDetails, ProfilePatch,
};
use funding_core_api::error::{ApiError, ApiResult};
use funding_core_api::service::AccountService;

use crate::gateway::{AccountsSnapshot, FundingGateway, SelectionStorage};
use crate::session::TokenSession;

#[derive(Debug, Clone)]
struct AccountState {
    borrower: Option<AccountProfile>,
    investor: Option<AccountProfile>,
    current: AccountType,
    can_create_new_project: bool,
    loaded: bool,
}

impl Default for AccountState {
    fn default() -> Self {
        Self {
            borrower: None,
            investor: None,
            current: AccountType::Borrower,
            can_create_new_project: true,
            loaded: false,
        }
    }
}

/// Owns the two possible role profiles for the current identity and the
/// current-account-type selection, persisted through `SelectionStorage`
/// and mirrored server-side.
pub struct AccountStore {
    session: Arc<TokenSession>,
    gateway: Arc<dyn FundingGateway>,
    selection: Arc<dyn SelectionStorage>,
    state: RwLock<AccountState>,
}

impl AccountStore {
    pub fn new(
        session: Arc<TokenSession>,
        gateway: Arc<dyn FundingGateway>,
        selection: Arc<dyn SelectionStorage>,
    ) -> Self {
        Self {
            session,
            gateway,
            selection,
            state: RwLock::new(AccountState::default()),
        }
    }

    /// Priority: server-declared current type, then the persisted local
    /// selection, then the bootstrap default of borrower. Whatever wins
    /// must be a type the user actually owns once any profile exists.
    fn resolve_current(
        snapshot: &AccountsSnapshot,
        persisted: Option<AccountType>,
    ) -> AccountType {
        let owns = |account_type: AccountType| match account_type {
            AccountType::Borrower => snapshot.borrower.is_some(),
            AccountType::Investor => snapshot.investor.is_some(),
        };

        for candidate in [snapshot.server_current_type, persisted, Some(AccountType::Borrower)]
            .into_iter()
            .flatten()
        {
            if owns(candidate) {
                return candidate;
            }
        }
        if snapshot.investor.is_some() {
            AccountType::Investor
        } else {
            AccountType::Borrower
        }
    }

    fn borrower_gate(borrower: Option<&AccountProfile>) -> bool {
        borrower.map(|p| !p.has_active_project()).unwrap_or(true)
    }

    /// Called by the project store whenever the set of active
    /// borrower-owned projects changes; keeps the derived gate and the
    /// cached borrower flag in line with the project cache.
    pub(crate) fn sync_project_gate(&self, has_active_project: bool) {
        let mut state = self.state.write();
        state.can_create_new_project = !has_active_project;
        if let Some(profile) = state.borrower.as_mut() {
            if let ProfileDetails::Borrower(details) = &mut profile.details {
                details.has_active_project = has_active_project;
            }
        }
    }

    fn install_profile(&self, profile: &AccountProfile) {
        let mut state = self.state.write();
        match profile.account_type() {
            AccountType::Borrower => {
                state.borrower = Some(profile.clone());
                state.can_create_new_project = Self::borrower_gate(state.borrower.as_ref());
            }
            AccountType::Investor => state.investor = Some(profile.clone()),
        }
    }
}

#[async_trait]
impl AccountService for AccountStore {
    async fn load_accounts(&self) -> ApiResult<()> {
        if !self.session.is_authenticated() {
            // Unauthenticated: fall silently into the empty state.
            *self.state.write() = AccountState::default();
            return Ok(());
        }

        let snapshot = match self.gateway.fetch_accounts().await {
            Ok(snapshot) => snapshot,
            // "no accounts yet" is a valid outcome, not a failure
            Err(ApiError::NotFound(_)) => None,
            Err(ApiError::Network(error)) if self.state.read().loaded => {
                tracing::warn!(%error, "account fetch failed, keeping cached snapshot");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let persisted = self.selection.load();
        let mut next = AccountState::default();
        if let Some(snapshot) = snapshot {
            next.current = Self::resolve_current(&snapshot, persisted);
            next.can_create_new_project = Self::borrower_gate(snapshot.borrower.as_ref());
            next.borrower = snapshot.borrower;
            next.investor = snapshot.investor;
        } else {
            next.current = persisted.unwrap_or(AccountType::Borrower);
        }
        next.loaded = true;

        let current = next.current;
        *self.state.write() = next;
        self.selection.store(current);
        Ok(())
    }

    async fn switch_account(&self, account_type: AccountType) -> ApiResult<()> {
        {
            let state = self.state.read();
            if state.current == account_type {
                return Ok(());
            }
        }
        if !self.has_account(account_type) {
            return Err(ApiError::AccountNotFound(account_type));
        }

        // Server first; local state and durable storage only move once the
        // remote side has agreed, so a failure leaves prior state untouched.
        self.gateway.switch_account(account_type).await?;

        self.state.write().current = account_type;
        self.selection.store(account_type);
        tracing::debug!(account_type = %account_type, "switched current account");
        Ok(())
    }

    async fn create_account(&self, details: ProfileDetails) -> ApiResult<AccountProfile> {
        let profile = self.gateway.create_account(&details).await?;
        self.install_profile(&profile);
        Ok(profile)
    }

    async fn update_account(
        &self,
        account_type: AccountType,
        patch: ProfilePatch,
    ) -> ApiResult<AccountProfile> {
        if !self.has_account(account_type) {
            return Err(ApiError::AccountNotFound(account_type));
        }
        let profile = self.gateway.update_account(account_type, &patch).await?;
        self.install_profile(&profile);
        Ok(profile)
    }

    fn has_account(&self, account_type: AccountType) -> bool {
        let state = self.state.read();
        match account_type {
            AccountType::Borrower => state.borrower.is_some(),
            AccountType::Investor => state.investor.is_some(),
        }
    }

    fn current_account_type(&self) -> AccountType {
        self.state.read().current
    }

    fn can_create_new_project(&self) -> bool {
        self.state.read().can_create_new_project
    }

    fn profile(&self, account_type: AccountType) -> Option<AccountProfile> {
        let state = self.state.read();
        match account_type {
            AccountType::Borrower => state.borrower.clone(),
            AccountType::Investor => state.investor.clone(),
        }
    }
}
