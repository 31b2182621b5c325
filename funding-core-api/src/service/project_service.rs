use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::investment::ReviewDecision;
use crate::domain::project::{NewProject, Project, ProjectPatch};
use crate::error::ApiResult;

/// Project lifecycle surface: draft → published → {completed | closed},
/// with the orthogonal pending → {approved | rejected} review dimension on
/// published projects.
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Fetch the project set scoped by the current account type: borrowers
    /// see only self-owned projects, investors see all published and
    /// approved projects through the discovery endpoint.
    async fn load_projects(&self) -> ApiResult<Vec<Project>>;

    /// Create a draft. Requires the borrower account to be current and the
    /// can-create-new-project gate to be open.
    async fn create_project(&self, draft: NewProject) -> ApiResult<Project>;

    /// Server deep-merge; the cached record is replaced, never merged
    /// locally.
    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> ApiResult<Project>;

    /// Irreversible removal, distinct from closing.
    async fn delete_project(&self, id: Uuid) -> ApiResult<()>;

    /// Draft → published(pending).
    async fn publish_project(&self, id: Uuid) -> ApiResult<Project>;

    /// Admin-only: published(pending) → published(approved | rejected).
    async fn review_project(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        feedback: Option<String>,
    ) -> ApiResult<Project>;

    /// Owner action on a reviewed published project.
    async fn complete_project(&self, id: Uuid) -> ApiResult<Project>;

    /// Owner action; closed is terminal and excluded from active counts.
    async fn close_project(&self, id: Uuid) -> ApiResult<Project>;

    fn projects(&self) -> Vec<Project>;

    fn project(&self, id: Uuid) -> Option<Project>;
}
