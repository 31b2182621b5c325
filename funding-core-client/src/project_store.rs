use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use funding_core_api::domain::account::AccountType;
use funding_core_api::domain::investment::{InvestmentRequest, InvestmentStatus, ReviewDecision};
use funding_core_api::domain::project::{
    validate_milestones, ApprovalStatus, NewProject, Project, ProjectPatch, ProjectStatus,
};
use funding_core_api::error::{ApiError, ApiResult};
use funding_core_api::service::{AccountService, ProjectService};

use crate::account_store::AccountStore;
use crate::gateway::FundingGateway;
use crate::session::TokenSession;

#[derive(Debug, Default)]
struct ProjectState {
    projects: Vec<Project>,
    loaded: bool,
}

/// Project lifecycle store, scoped by the current account type. Borrowers
/// see only self-owned projects; investors see the discovery set. Every
/// mutation installs the server's canonical record in place of the cached
/// one and re-syncs the account store's creation gate.
pub struct ProjectStore {
    pub(crate) session: Arc<TokenSession>,
    pub(crate) gateway: Arc<dyn FundingGateway>,
    pub(crate) accounts: Arc<AccountStore>,
    pub(crate) state: RwLock<ProjectState>,
}

impl ProjectStore {
    pub fn new(
        session: Arc<TokenSession>,
        gateway: Arc<dyn FundingGateway>,
        accounts: Arc<AccountStore>,
    ) -> Self {
        Self {
            session,
            gateway,
            accounts,
            state: RwLock::new(ProjectState::default()),
        }
    }

    pub(crate) fn replace_record(&self, project: Project) {
        let mut state = self.state.write();
        match state.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => state.projects.push(project),
        }
    }

    fn remove_record(&self, id: Uuid) {
        self.state.write().projects.retain(|p| p.id != id);
    }

    /// Install a resolved request into its cached project, if still cached.
    pub(crate) fn apply_request_update(&self, updated: &InvestmentRequest) {
        let mut state = self.state.write();
        if let Some(project) = state
            .projects
            .iter_mut()
            .find(|p| p.id == updated.project_id)
        {
            if let Some(request) = project
                .investment_requests
                .iter_mut()
                .find(|r| r.id == updated.id)
            {
                *request = updated.clone();
            }
        }
    }

    /// Flip a cached request to failed; false when no project carries it.
    pub(crate) fn mark_request_failed(&self, request_id: Uuid) -> bool {
        let mut state = self.state.write();
        for project in state.projects.iter_mut() {
            if let Some(request) = project
                .investment_requests
                .iter_mut()
                .find(|r| r.id == request_id)
            {
                request.status = InvestmentStatus::Failed;
                return true;
            }
        }
        false
    }

    /// The creation gate is derived from the borrower's project set, never
    /// stored independently.
    pub(crate) fn sync_account_gate(&self) {
        if self.accounts.current_account_type() != AccountType::Borrower {
            return;
        }
        let has_active = self.state.read().projects.iter().any(|p| p.is_active());
        self.accounts.sync_project_gate(has_active);
    }

    fn owned_project(&self, id: Uuid) -> ApiResult<Project> {
        let project = self
            .project(id)
            .ok_or_else(|| ApiError::NotFound(format!("project {id}")))?;
        if project.owner_id != self.session.user_id()? {
            // borrower caches are self-owned; anything else reads as absent
            return Err(ApiError::NotFound(format!("project {id}")));
        }
        Ok(project)
    }
}

#[async_trait]
impl ProjectService for ProjectStore {
    async fn load_projects(&self) -> ApiResult<Vec<Project>> {
        let scope = self.accounts.current_account_type();
        let fetched = match scope {
            AccountType::Borrower => self.gateway.fetch_owned_projects().await,
            AccountType::Investor => self.gateway.fetch_discovery_projects().await,
        };
        let projects = match fetched {
            Ok(list) => match scope {
                // defense against over-broad server responses
                AccountType::Borrower => {
                    let user_id = self.session.user_id()?;
                    list.into_iter().filter(|p| p.owner_id == user_id).collect()
                }
                AccountType::Investor => list,
            },
            Err(ApiError::Network(error)) if self.state.read().loaded => {
                tracing::warn!(%error, "project fetch failed, serving cached snapshot");
                return Ok(self.projects());
            }
            Err(e) => return Err(e),
        };

        {
            let mut state = self.state.write();
            state.projects = projects;
            state.loaded = true;
        }
        self.sync_account_gate();
        Ok(self.projects())
    }

    async fn create_project(&self, draft: NewProject) -> ApiResult<Project> {
        if self.accounts.current_account_type() != AccountType::Borrower {
            return Err(ApiError::WrongAccountType(AccountType::Borrower));
        }
        if !self.accounts.has_account(AccountType::Borrower) {
            return Err(ApiError::AccountNotFound(AccountType::Borrower));
        }
        if !self.accounts.can_create_new_project() {
            return Err(ApiError::ActiveProjectExists);
        }
        validate_milestones(&draft.milestones)?;

        let project = self.gateway.create_project(&draft).await?;
        tracing::info!(project_id = %project.id, "created draft project");
        self.replace_record(project.clone());
        self.sync_account_gate();
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> ApiResult<Project> {
        if let Some(milestones) = &patch.milestones {
            validate_milestones(milestones)?;
        }
        let project = self.gateway.update_project(id, &patch).await?;
        self.replace_record(project.clone());
        self.sync_account_gate();
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> ApiResult<()> {
        self.owned_project(id)?;
        self.gateway.delete_project(id).await?;
        tracing::info!(project_id = %id, "deleted project");
        self.remove_record(id);
        self.sync_account_gate();
        Ok(())
    }

    async fn publish_project(&self, id: Uuid) -> ApiResult<Project> {
        let current = self.owned_project(id)?;
        if current.status != ProjectStatus::Draft {
            return Err(ApiError::InvalidTransition {
                from: current.status,
                event: "publish",
            });
        }
        // drafts may have been edited since creation
        validate_milestones(&current.milestones)?;

        let project = self.gateway.publish_project(id).await?;
        tracing::info!(project_id = %id, "submitted project for review");
        self.replace_record(project.clone());
        Ok(project)
    }

    async fn review_project(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        feedback: Option<String>,
    ) -> ApiResult<Project> {
        if !self.session.is_admin() {
            return Err(ApiError::Auth);
        }
        if let Some(cached) = self.project(id) {
            let pending = cached.status == ProjectStatus::Published
                && cached.approval_status == Some(ApprovalStatus::Pending);
            if !pending {
                return Err(ApiError::InvalidTransition {
                    from: cached.status,
                    event: "review",
                });
            }
        }

        let project = self
            .gateway
            .review_project(id, decision, feedback.as_deref())
            .await?;
        tracing::info!(project_id = %id, decision = %decision, "reviewed project");
        self.replace_record(project.clone());
        Ok(project)
    }

    async fn complete_project(&self, id: Uuid) -> ApiResult<Project> {
        let current = self.owned_project(id)?;
        let reviewed = current.status == ProjectStatus::Published
            && matches!(
                current.approval_status,
                Some(ApprovalStatus::Approved) | Some(ApprovalStatus::Rejected)
            );
        if !reviewed {
            return Err(ApiError::InvalidTransition {
                from: current.status,
                event: "complete",
            });
        }

        let patch = ProjectPatch {
            status: Some(ProjectStatus::Completed),
            ..ProjectPatch::default()
        };
        let project = self.gateway.update_project(id, &patch).await?;
        tracing::info!(project_id = %id, "completed project");
        self.replace_record(project.clone());
        self.sync_account_gate();
        Ok(project)
    }

    async fn close_project(&self, id: Uuid) -> ApiResult<Project> {
        let current = self.owned_project(id)?;
        if !current.is_active() {
            return Err(ApiError::InvalidTransition {
                from: current.status,
                event: "close",
            });
        }

        let patch = ProjectPatch {
            status: Some(ProjectStatus::Closed),
            ..ProjectPatch::default()
        };
        let project = self.gateway.update_project(id, &patch).await?;
        tracing::info!(project_id = %id, "closed project");
        self.replace_record(project.clone());
        self.sync_account_gate();
        Ok(project)
    }

    fn projects(&self) -> Vec<Project> {
        self.state.read().projects.clone()
    }

    fn project(&self, id: Uuid) -> Option<Project> {
        self.state.read().projects.iter().find(|p| p.id == id).cloned()
    }
}
