use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use uuid::Uuid;

use funding_core_api::domain::account::{
    AccountProfile, AccountType, ProfileDetails, ProfilePatch,
};
use funding_core_api::domain::investment::{InvestmentRequest, ReviewDecision};
use funding_core_api::domain::notification::Notification;
use funding_core_api::domain::project::{NewProject, Project, ProjectPatch};
use funding_core_api::error::ApiResult;

use crate::session::BearerToken;

/// Both role profiles for one identity, plus the server-declared current
/// account type, as returned by the accounts endpoint.
#[derive(Debug, Clone)]
pub struct AccountsSnapshot {
    pub borrower: Option<AccountProfile>,
    pub investor: Option<AccountProfile>,
    pub server_current_type: Option<AccountType>,
}

/// Transport seam the stores talk through.
///
/// Every implementation treats the server as the single source of truth:
/// mutating calls return the canonical post-mutation record, which the
/// stores install wholesale in place of their cached copy.
#[async_trait]
pub trait FundingGateway: Send + Sync {
    /// Exchange the current credential for a fresh one.
    async fn refresh_token(&self) -> ApiResult<BearerToken>;

    /// Fetch both profiles. `Ok(None)` is the valid "no accounts yet"
    /// outcome (a 404 on the wire), not an error.
    async fn fetch_accounts(&self) -> ApiResult<Option<AccountsSnapshot>>;

    async fn switch_account(&self, account_type: AccountType) -> ApiResult<()>;

    async fn create_account(&self, details: &ProfileDetails) -> ApiResult<AccountProfile>;

    async fn update_account(
        &self,
        account_type: AccountType,
        patch: &ProfilePatch,
    ) -> ApiResult<AccountProfile>;

    /// Projects owned by the calling user, all statuses.
    async fn fetch_owned_projects(&self) -> ApiResult<Vec<Project>>;

    /// Discovery scope: all published and approved projects system-wide.
    async fn fetch_discovery_projects(&self) -> ApiResult<Vec<Project>>;

    async fn create_project(&self, draft: &NewProject) -> ApiResult<Project>;

    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> ApiResult<Project>;

    async fn delete_project(&self, id: Uuid) -> ApiResult<()>;

    async fn publish_project(&self, id: Uuid) -> ApiResult<Project>;

    async fn review_project(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        feedback: Option<&str>,
    ) -> ApiResult<Project>;

    /// Append a pending request as the calling user; returns the project
    /// with the embedded request list updated.
    async fn submit_investment(&self, project_id: Uuid, amount: Decimal) -> ApiResult<Project>;

    async fn resolve_investment(
        &self,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> ApiResult<InvestmentRequest>;

    async fn fetch_notifications(&self, limit: usize) -> ApiResult<Vec<Notification>>;

    async fn mark_notification_read(&self, id: Uuid) -> ApiResult<()>;

    async fn mark_all_notifications_read(&self) -> ApiResult<()>;

    async fn delete_notification(&self, id: Uuid) -> ApiResult<()>;
}

/// Durable client storage for the single persisted key: the current
/// account type selection.
pub trait SelectionStorage: Send + Sync {
    fn load(&self) -> Option<AccountType>;
    fn store(&self, account_type: AccountType);
}

/// Process-local selection storage; the durable file-backed implementation
/// lives with the HTTP transport.
#[derive(Debug, Default)]
pub struct MemorySelectionStorage {
    value: Mutex<Option<AccountType>>,
}

impl SelectionStorage for MemorySelectionStorage {
    fn load(&self) -> Option<AccountType> {
        *self.value.lock()
    }

    fn store(&self, account_type: AccountType) {
        *self.value.lock() = Some(account_type);
    }
}
