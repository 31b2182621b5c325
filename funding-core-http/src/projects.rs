use uuid::Uuid;

use funding_core_api::domain::investment::ReviewDecision;
use funding_core_api::domain::project::{NewProject, Project, ProjectPatch};
use funding_core_api::error::{ApiError, ApiResult};

use crate::error::ResponseExt;
use crate::wire::{ListResponse, ProjectEnvelope, ReviewRequest};
use crate::HttpGateway;

impl HttpGateway {
    /// Borrower scope: the caller's own projects, all statuses.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn get_owned_projects(&self) -> ApiResult<Vec<Project>> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/projects", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<ListResponse<Project>>().await.map_err(|e| {
            ApiError::Internal(format!(
                "unable to parse response from get_owned_projects: {e}"
            ))
        })?;
        Ok(body.into_items())
    }

    /// Discovery scope: published and approved projects system-wide.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn get_discovery_projects(&self) -> ApiResult<Vec<Project>> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/calendar/projects", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<ListResponse<Project>>().await.map_err(|e| {
            ApiError::Internal(format!(
                "unable to parse response from get_discovery_projects: {e}"
            ))
        })?;
        Ok(body.into_items())
    }

    #[tracing::instrument(skip(self, draft))]
    pub(crate) async fn post_create_project(&self, draft: &NewProject) -> ApiResult<Project> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/projects", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .json(draft)
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<ProjectEnvelope>().await.map_err(|e| {
            ApiError::Internal(format!(
                "unable to parse response from post_create_project: {e}"
            ))
        })?;
        Ok(body.project)
    }

    #[tracing::instrument(skip(self, patch))]
    pub(crate) async fn put_project(&self, id: Uuid, patch: &ProjectPatch) -> ApiResult<Project> {
        let token = self.bearer()?;
        let response = self
            .client
            .put(format!("{}/projects/{}", self.url, id))
            .header("Authorization", format!("Bearer {}", token))
            .json(patch)
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<ProjectEnvelope>().await.map_err(|e| {
            ApiError::Internal(format!("unable to parse response from put_project: {e}"))
        })?;
        Ok(body.project)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn delete_project_by_id(&self, id: Uuid) -> ApiResult<()> {
        let token = self.bearer()?;
        self.client
            .delete(format!("{}/projects/{}", self.url, id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn post_publish_project(&self, id: Uuid) -> ApiResult<Project> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/projects/{}/publish", self.url, id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<ProjectEnvelope>().await.map_err(|e| {
            ApiError::Internal(format!(
                "unable to parse response from post_publish_project: {e}"
            ))
        })?;
        Ok(body.project)
    }

    #[tracing::instrument(skip(self, feedback))]
    pub(crate) async fn post_review_project(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        feedback: Option<&str>,
    ) -> ApiResult<Project> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/admin/projects/{}/review", self.url, id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&ReviewRequest {
                action: decision,
                feedback,
            })
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<ProjectEnvelope>().await.map_err(|e| {
            ApiError::Internal(format!(
                "unable to parse response from post_review_project: {e}"
            ))
        })?;
        Ok(body.project)
    }
}
