use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub mod accounts;
pub mod auth;
pub(crate) mod error;
pub mod investments;
pub mod notifications;
pub mod projects;
pub mod selection;
pub(crate) mod wire;

use funding_core_api::domain::account::{
    AccountProfile, AccountType, ProfileDetails, ProfilePatch,
};
use funding_core_api::domain::investment::{InvestmentRequest, ReviewDecision};
use funding_core_api::domain::notification::Notification;
use funding_core_api::domain::project::{NewProject, Project, ProjectPatch};
use funding_core_api::error::ApiResult;
use funding_core_client::gateway::{AccountsSnapshot, FundingGateway};
use funding_core_client::session::{BearerToken, TokenSession};

pub use selection::FileSelectionStorage;

/// Wire transport for the funding platform API. Holds the shared session
/// so the rotating bearer credential is read per request.
#[derive(Clone)]
pub struct HttpGateway {
    url: String,
    client: reqwest::Client,
    session: Arc<TokenSession>,
}

impl HttpGateway {
    pub fn new(url: String, session: Arc<TokenSession>) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
            session,
        }
    }

    pub(crate) fn bearer(&self) -> ApiResult<String> {
        self.session.bearer()
    }

    pub(crate) fn session(&self) -> &TokenSession {
        &self.session
    }
}

#[async_trait]
impl FundingGateway for HttpGateway {
    async fn refresh_token(&self) -> ApiResult<BearerToken> {
        self.post_refresh_token().await
    }

    async fn fetch_accounts(&self) -> ApiResult<Option<AccountsSnapshot>> {
        self.get_accounts().await
    }

    async fn switch_account(&self, account_type: AccountType) -> ApiResult<()> {
        self.post_switch_account(account_type).await
    }

    async fn create_account(&self, details: &ProfileDetails) -> ApiResult<AccountProfile> {
        self.post_create_account(details).await
    }

    async fn update_account(
        &self,
        account_type: AccountType,
        patch: &ProfilePatch,
    ) -> ApiResult<AccountProfile> {
        self.put_account(account_type, patch).await
    }

    async fn fetch_owned_projects(&self) -> ApiResult<Vec<Project>> {
        self.get_owned_projects().await
    }

    async fn fetch_discovery_projects(&self) -> ApiResult<Vec<Project>> {
        self.get_discovery_projects().await
    }

    async fn create_project(&self, draft: &NewProject) -> ApiResult<Project> {
        self.post_create_project(draft).await
    }

    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> ApiResult<Project> {
        self.put_project(id, patch).await
    }

    async fn delete_project(&self, id: Uuid) -> ApiResult<()> {
        self.delete_project_by_id(id).await
    }

    async fn publish_project(&self, id: Uuid) -> ApiResult<Project> {
        self.post_publish_project(id).await
    }

    async fn review_project(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        feedback: Option<&str>,
    ) -> ApiResult<Project> {
        self.post_review_project(id, decision, feedback).await
    }

    async fn submit_investment(&self, project_id: Uuid, amount: Decimal) -> ApiResult<Project> {
        self.post_submit_investment(project_id, amount).await
    }

    async fn resolve_investment(
        &self,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> ApiResult<InvestmentRequest> {
        self.post_resolve_investment(request_id, decision).await
    }

    async fn fetch_notifications(&self, limit: usize) -> ApiResult<Vec<Notification>> {
        self.get_notifications(limit).await
    }

    async fn mark_notification_read(&self, id: Uuid) -> ApiResult<()> {
        self.patch_notification_read(id).await
    }

    async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.patch_all_notifications_read().await
    }

    async fn delete_notification(&self, id: Uuid) -> ApiResult<()> {
        self.delete_notification_by_id(id).await
    }
}
