//! Shared test doubles and builders for the store tests.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use funding_core_api::domain::account::{
    AccountProfile, AccountType, BorrowerDetails, InvestorDetails, ProfileDetails, ProfilePatch,
    RiskTolerance,
};
use funding_core_api::domain::investment::{
    InvestmentRequest, InvestmentStatus, ReviewDecision,
};
use funding_core_api::domain::notification::{Notification, NotificationType, RelatedRequestType};
use funding_core_api::domain::project::{
    ApprovalStatus, FundingTerms, Milestone, NewProject, PayoutFrequency, PayoutSchedule,
    Project, ProjectDetails, ProjectPatch, ProjectStatus, RoiTerms, SalesRecord,
};
use funding_core_api::error::{ApiError, ApiResult};
use funding_core_api::service::AccountService;

use crate::account_store::AccountStore;
use crate::gateway::{AccountsSnapshot, FundingGateway, MemorySelectionStorage, SelectionStorage};
use crate::notification_store::NotificationStore;
use crate::project_store::ProjectStore;
use crate::session::{BearerToken, Identity, TokenSession};

#[derive(Default)]
struct ServerState {
    borrower: Option<AccountProfile>,
    investor: Option<AccountProfile>,
    server_current: Option<AccountType>,
    projects: Vec<Project>,
    notifications: Vec<Notification>,
    leak_foreign_into_owned: bool,
}

/// Scripted server double. Business guards (self-investment, dedup) are
/// deliberately left to the stores under test; the double only keeps
/// canonical state and echoes it back the way the real server would.
pub(crate) struct InMemoryGateway {
    session: Arc<TokenSession>,
    state: Mutex<ServerState>,
    fail_next: Mutex<Option<ApiError>>,
}

impl InMemoryGateway {
    pub(crate) fn new(session: Arc<TokenSession>) -> Self {
        Self {
            session,
            state: Mutex::new(ServerState::default()),
            fail_next: Mutex::new(None),
        }
    }

    /// Make the next gateway call fail with the given error.
    pub(crate) fn fail_next(&self, error: ApiError) {
        *self.fail_next.lock() = Some(error);
    }

    pub(crate) fn set_server_current(&self, account_type: AccountType) {
        self.state.lock().server_current = Some(account_type);
    }

    /// Insert a project owned by some other user.
    pub(crate) fn seed_foreign_project(
        &self,
        status: ProjectStatus,
        approval_status: Option<ApprovalStatus>,
    ) -> Project {
        let mut project = build_project(Uuid::new_v4(), create_test_new_project());
        project.status = status;
        project.approval_status = approval_status;
        self.state.lock().projects.push(project.clone());
        project
    }

    /// Simulate an over-broad owned-projects response, which the borrower
    /// store must filter down to self-owned records.
    pub(crate) fn leak_foreign_project_into_owned_scope(&self) {
        self.seed_foreign_project(ProjectStatus::Draft, None);
        self.state.lock().leak_foreign_into_owned = true;
    }

    pub(crate) fn seed_notification(&self, notification: Notification) {
        self.state.lock().notifications.push(notification);
    }

    fn check_fail(&self) -> ApiResult<()> {
        match self.fail_next.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn apply_profile_patch(profile: &mut AccountProfile, patch: &ProfilePatch) {
    match &mut profile.details {
        ProfileDetails::Borrower(details) => {
            if let Some(occupation) = &patch.occupation {
                details.occupation = occupation.clone();
            }
            if let Some(business_name) = &patch.business_name {
                details.business_name = business_name.clone();
            }
            if let Some(business_sector) = &patch.business_sector {
                details.business_sector = Some(business_sector.clone());
            }
            if let Some(monthly_income) = patch.monthly_income {
                details.monthly_income = Some(monthly_income);
            }
        }
        ProfileDetails::Investor(details) => {
            if let Some(risk_tolerance) = patch.risk_tolerance {
                details.risk_tolerance = risk_tolerance;
            }
            if let Some(portfolio_value) = patch.portfolio_value {
                details.portfolio_value = Some(portfolio_value);
            }
            if let Some(preferred) = &patch.preferred_project_types {
                details.preferred_project_types = preferred.clone();
            }
        }
    }
    if let Some(complete) = patch.complete {
        profile.complete = complete;
    }
    profile.updated_at = Utc::now();
}

fn apply_project_patch(project: &mut Project, patch: &ProjectPatch) {
    if let Some(title) = &patch.title {
        project.details.title = title.clone();
    }
    if let Some(description) = &patch.description {
        project.details.description = description.clone();
    }
    if let Some(image) = &patch.image {
        project.details.image = Some(image.clone());
    }
    if let Some(funding_goal) = patch.funding_goal {
        project.details.funding_goal = funding_goal;
    }
    if let Some(terms) = &patch.terms {
        project.details.terms = terms.clone();
    }
    if let Some(milestones) = &patch.milestones {
        project.milestones = milestones.clone();
    }
    if let Some(roi) = &patch.roi {
        project.roi = roi.clone();
    }
    if let Some(sales) = &patch.sales {
        project.sales = sales.clone();
    }
    if let Some(payout_schedule) = &patch.payout_schedule {
        project.payout_schedule = payout_schedule.clone();
    }
    if let Some(status) = patch.status {
        project.status = status;
    }
    project.updated_at = Utc::now();
}

fn build_project(owner_id: Uuid, draft: NewProject) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        owner_id,
        status: ProjectStatus::Draft,
        approval_status: None,
        details: draft.details,
        milestones: draft.milestones,
        roi: draft.roi,
        sales: draft.sales,
        payout_schedule: draft.payout_schedule,
        investment_requests: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl FundingGateway for InMemoryGateway {
    async fn refresh_token(&self) -> ApiResult<BearerToken> {
        self.check_fail()?;
        Ok(BearerToken {
            token: "refreshed-token".to_string(),
            expires_at: Utc::now() + ChronoDuration::minutes(60),
        })
    }

    async fn fetch_accounts(&self) -> ApiResult<Option<AccountsSnapshot>> {
        self.check_fail()?;
        let state = self.state.lock();
        if state.borrower.is_none() && state.investor.is_none() {
            return Ok(None);
        }
        Ok(Some(AccountsSnapshot {
            borrower: state.borrower.clone(),
            investor: state.investor.clone(),
            server_current_type: state.server_current,
        }))
    }

    async fn switch_account(&self, account_type: AccountType) -> ApiResult<()> {
        self.check_fail()?;
        self.state.lock().server_current = Some(account_type);
        Ok(())
    }

    async fn create_account(&self, details: &ProfileDetails) -> ApiResult<AccountProfile> {
        self.check_fail()?;
        let now = Utc::now();
        let profile = AccountProfile {
            id: Uuid::new_v4(),
            user_id: self.session.user_id()?,
            complete: true,
            details: details.clone(),
            created_at: now,
            updated_at: now,
        };
        let mut state = self.state.lock();
        match profile.account_type() {
            AccountType::Borrower => state.borrower = Some(profile.clone()),
            AccountType::Investor => state.investor = Some(profile.clone()),
        }
        Ok(profile)
    }

    async fn update_account(
        &self,
        account_type: AccountType,
        patch: &ProfilePatch,
    ) -> ApiResult<AccountProfile> {
        self.check_fail()?;
        let mut state = self.state.lock();
        let slot = match account_type {
            AccountType::Borrower => &mut state.borrower,
            AccountType::Investor => &mut state.investor,
        };
        let profile = slot
            .as_mut()
            .ok_or_else(|| ApiError::NotFound(format!("{account_type} account")))?;
        apply_profile_patch(profile, patch);
        Ok(profile.clone())
    }

    async fn fetch_owned_projects(&self) -> ApiResult<Vec<Project>> {
        self.check_fail()?;
        let caller = self.session.user_id()?;
        let state = self.state.lock();
        if state.leak_foreign_into_owned {
            return Ok(state.projects.clone());
        }
        Ok(state
            .projects
            .iter()
            .filter(|p| p.owner_id == caller)
            .cloned()
            .collect())
    }

    async fn fetch_discovery_projects(&self) -> ApiResult<Vec<Project>> {
        self.check_fail()?;
        Ok(self
            .state
            .lock()
            .projects
            .iter()
            .filter(|p| {
                p.status == ProjectStatus::Published
                    && p.approval_status == Some(ApprovalStatus::Approved)
            })
            .cloned()
            .collect())
    }

    async fn create_project(&self, draft: &NewProject) -> ApiResult<Project> {
        self.check_fail()?;
        let project = build_project(self.session.user_id()?, draft.clone());
        self.state.lock().projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> ApiResult<Project> {
        self.check_fail()?;
        let mut state = self.state.lock();
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("project {id}")))?;
        apply_project_patch(project, patch);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> ApiResult<()> {
        self.check_fail()?;
        self.state.lock().projects.retain(|p| p.id != id);
        Ok(())
    }

    async fn publish_project(&self, id: Uuid) -> ApiResult<Project> {
        self.check_fail()?;
        let mut state = self.state.lock();
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("project {id}")))?;
        project.status = ProjectStatus::Published;
        project.approval_status = Some(ApprovalStatus::Pending);
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn review_project(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        _feedback: Option<&str>,
    ) -> ApiResult<Project> {
        self.check_fail()?;
        let mut state = self.state.lock();
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("project {id}")))?;
        project.approval_status = Some(match decision {
            ReviewDecision::Approve => ApprovalStatus::Approved,
            ReviewDecision::Reject => ApprovalStatus::Rejected,
        });
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn submit_investment(&self, project_id: Uuid, amount: Decimal) -> ApiResult<Project> {
        self.check_fail()?;
        let investor_id = self.session.user_id()?;
        let mut state = self.state.lock();
        let request = InvestmentRequest {
            id: Uuid::new_v4(),
            project_id,
            investor_id,
            amount,
            submitted_at: Utc::now(),
            status: InvestmentStatus::Pending,
        };
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| ApiError::NotFound(format!("project {project_id}")))?;
        project.investment_requests.push(request.clone());
        let updated = project.clone();
        state.notifications.push(Notification {
            id: Uuid::new_v4(),
            notification_type: NotificationType::InvestmentSubmitted,
            read: false,
            related_request_id: Some(request.id),
            related_request_type: Some(RelatedRequestType::Investment),
            created_at: Utc::now(),
        });
        Ok(updated)
    }

    async fn resolve_investment(
        &self,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> ApiResult<InvestmentRequest> {
        self.check_fail()?;
        let mut state = self.state.lock();
        for project in state.projects.iter_mut() {
            if let Some(request) = project
                .investment_requests
                .iter_mut()
                .find(|r| r.id == request_id)
            {
                request.status = match decision {
                    ReviewDecision::Approve => InvestmentStatus::Approved,
                    ReviewDecision::Reject => InvestmentStatus::Rejected,
                };
                return Ok(request.clone());
            }
        }
        Err(ApiError::NotFound(format!(
            "investment request {request_id}"
        )))
    }

    async fn fetch_notifications(&self, limit: usize) -> ApiResult<Vec<Notification>> {
        self.check_fail()?;
        Ok(self
            .state
            .lock()
            .notifications
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, id: Uuid) -> ApiResult<()> {
        self.check_fail()?;
        let mut state = self.state.lock();
        let item = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("notification {id}")))?;
        item.read = true;
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.check_fail()?;
        for item in self.state.lock().notifications.iter_mut() {
            item.read = true;
        }
        Ok(())
    }

    async fn delete_notification(&self, id: Uuid) -> ApiResult<()> {
        self.check_fail()?;
        self.state.lock().notifications.retain(|n| n.id != id);
        Ok(())
    }
}

/// One wired-up set of stores over the in-memory gateway, in the shape the
/// real application assembles them.
pub(crate) struct TestEnv {
    pub(crate) session: Arc<TokenSession>,
    pub(crate) gateway: Arc<InMemoryGateway>,
    pub(crate) selection: Arc<MemorySelectionStorage>,
    pub(crate) accounts: Arc<AccountStore>,
    pub(crate) projects: Arc<ProjectStore>,
    pub(crate) notifications: Arc<NotificationStore>,
}

impl TestEnv {
    pub(crate) fn new(admin: bool) -> Self {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            admin,
        };
        let token = BearerToken {
            token: "test-token".to_string(),
            expires_at: Utc::now() + ChronoDuration::minutes(60),
        };
        Self::with_session(Arc::new(TokenSession::authenticated(identity, token)))
    }

    pub(crate) fn unauthenticated() -> Self {
        Self::with_session(Arc::new(TokenSession::new()))
    }

    fn with_session(session: Arc<TokenSession>) -> Self {
        let gateway = Arc::new(InMemoryGateway::new(Arc::clone(&session)));
        let gateway_dyn: Arc<dyn FundingGateway> = gateway.clone();
        let selection = Arc::new(MemorySelectionStorage::default());
        let selection_dyn: Arc<dyn SelectionStorage> = selection.clone();
        let accounts = Arc::new(AccountStore::new(
            Arc::clone(&session),
            Arc::clone(&gateway_dyn),
            selection_dyn,
        ));
        let projects = Arc::new(ProjectStore::new(
            Arc::clone(&session),
            Arc::clone(&gateway_dyn),
            Arc::clone(&accounts),
        ));
        let notifications = Arc::new(NotificationStore::new(
            Arc::clone(&session),
            gateway_dyn,
        ));
        Self {
            session,
            gateway,
            selection,
            accounts,
            projects,
            notifications,
        }
    }

    pub(crate) async fn seed_borrower_account(&self) {
        self.accounts
            .create_account(create_test_borrower_details())
            .await
            .unwrap();
        self.accounts.load_accounts().await.unwrap();
    }

    pub(crate) async fn seed_investor_account(&self) {
        self.accounts
            .create_account(create_test_investor_details())
            .await
            .unwrap();
        self.accounts.load_accounts().await.unwrap();
    }
}

pub(crate) fn create_test_borrower_details() -> ProfileDetails {
    ProfileDetails::Borrower(BorrowerDetails {
        occupation: "shop owner".try_into().unwrap(),
        business_name: "Corner Sari-Sari".try_into().unwrap(),
        business_sector: Some("retail".try_into().unwrap()),
        monthly_income: Some(Decimal::from(45_000)),
        has_active_project: false,
    })
}

pub(crate) fn create_test_investor_details() -> ProfileDetails {
    ProfileDetails::Investor(InvestorDetails {
        risk_tolerance: RiskTolerance::Moderate,
        portfolio_value: Some(Decimal::from(250_000)),
        preferred_project_types: vec![],
    })
}

pub(crate) fn create_test_new_project() -> NewProject {
    let mut milestones = heapless::Vec::new();
    milestones
        .push(Milestone {
            amount: Decimal::from(20_000),
            percentage: Decimal::from(40),
            release_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            evidence_image: None,
        })
        .unwrap();
    milestones
        .push(Milestone {
            amount: Decimal::from(30_000),
            percentage: Decimal::from(60),
            release_date: chrono::NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            evidence_image: None,
        })
        .unwrap();

    NewProject {
        details: ProjectDetails {
            title: "Sari-sari store expansion".try_into().unwrap(),
            description: "Stock expansion and a second storefront".try_into().unwrap(),
            image: None,
            funding_goal: Decimal::from(50_000),
            terms: FundingTerms::Lending {
                interest_rate: Decimal::new(85, 1),
                term_months: 12,
            },
        },
        milestones,
        roi: RoiTerms {
            expected_rate: Decimal::new(85, 1),
            distribution: PayoutFrequency::Monthly,
        },
        sales: SalesRecord::default(),
        payout_schedule: PayoutSchedule {
            frequency: PayoutFrequency::Monthly,
            first_payout_date: None,
        },
    }
}

pub(crate) fn create_test_notification(
    notification_type: NotificationType,
    read: bool,
) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        notification_type,
        read,
        related_request_id: None,
        related_request_type: None,
        created_at: Utc::now(),
    }
}
