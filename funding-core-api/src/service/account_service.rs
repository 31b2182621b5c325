use async_trait::async_trait;

use crate::domain::account::{AccountProfile, AccountType, ProfileDetails, ProfilePatch};
use crate::error::ApiResult;

/// Dual-account synchronization surface.
///
/// Owns the two possible role profiles for the current identity, the
/// current-account-type selector, and the derived can-create-new-project
/// eligibility flag. The server is the single source of truth: every
/// mutation replaces the local cache with the server's canonical response.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Fetch both profiles for the current identity.
    ///
    /// Resolves the current account type by priority: server-declared
    /// current type, then the persisted local selection, then the
    /// bootstrap default of borrower. Falls silently into an
    /// unauthenticated empty state when no session exists; a "no accounts
    /// yet" outcome from the server is valid, not an error.
    async fn load_accounts(&self) -> ApiResult<()>;

    /// Switch the current role profile.
    ///
    /// No-op when already current. Fails with `ApiError::AccountNotFound`
    /// when the user has no profile of that type. Atomic from the
    /// caller's view: either local and remote state agree afterwards, or
    /// the operation fails and prior state is untouched.
    async fn switch_account(&self, account_type: AccountType) -> ApiResult<()>;

    /// Create a profile server-side and store the normalized result.
    async fn create_account(&self, details: ProfileDetails) -> ApiResult<AccountProfile>;

    /// Server-merge a partial update; the local cache is replaced
    /// wholesale with the server's version.
    async fn update_account(
        &self,
        account_type: AccountType,
        patch: ProfilePatch,
    ) -> ApiResult<AccountProfile>;

    /// Pure predicate over loaded profiles.
    fn has_account(&self, account_type: AccountType) -> bool;

    fn current_account_type(&self) -> AccountType;

    /// Derived gate: false whenever the borrower owns a project that is
    /// neither closed nor completed.
    fn can_create_new_project(&self) -> bool;

    fn profile(&self, account_type: AccountType) -> Option<AccountProfile>;
}
