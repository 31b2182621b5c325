use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use funding_core_api::domain::investment::{
    InvestmentRequest, InvestmentStatus, ReviewDecision,
};
use funding_core_api::error::{ApiError, ApiResult};
use funding_core_api::service::{InvestmentService, ProjectService};

use crate::project_store::ProjectStore;

/// Investment request engine, embedded in the project store: requests live
/// inside their project records and every resolution flows back through
/// the same cache.
#[async_trait]
impl InvestmentService for ProjectStore {
    async fn submit_investment(
        &self,
        project_id: Uuid,
        amount: Decimal,
    ) -> ApiResult<InvestmentRequest> {
        let investor_id = self.session.user_id()?;
        let project = self
            .project(project_id)
            .ok_or_else(|| ApiError::NotFound(format!("project {project_id}")))?;

        if project.owner_id == investor_id {
            return Err(ApiError::SelfInvestment);
        }
        // dedup is enforced against the latest loaded state, not by
        // request-level idempotency keys
        if project.active_request_for(investor_id).is_some() {
            return Err(ApiError::DuplicateRequest);
        }

        let updated = self.gateway.submit_investment(project_id, amount).await?;
        let request = updated
            .active_request_for(investor_id)
            .cloned()
            .ok_or_else(|| {
                ApiError::Internal("server response missing the submitted request".to_string())
            })?;
        tracing::info!(
            project_id = %project_id,
            request_id = %request.id,
            "submitted investment request"
        );
        self.replace_record(updated);
        Ok(request)
    }

    async fn resolve_investment(
        &self,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> ApiResult<InvestmentRequest> {
        if !self.session.is_admin() {
            return Err(ApiError::Auth);
        }
        let cached = self
            .projects()
            .iter()
            .find_map(|p| p.request(request_id).cloned());
        if let Some(request) = cached {
            if request.status != InvestmentStatus::Pending {
                return Err(ApiError::RequestNotPending);
            }
        }

        let resolved = self.gateway.resolve_investment(request_id, decision).await?;
        tracing::info!(request_id = %request_id, decision = %decision, "resolved investment request");
        self.apply_request_update(&resolved);
        Ok(resolved)
    }

    fn record_investment_failure(&self, request_id: Uuid) -> ApiResult<()> {
        if !self.mark_request_failed(request_id) {
            return Err(ApiError::NotFound(format!(
                "investment request {request_id}"
            )));
        }
        tracing::warn!(request_id = %request_id, "investment request failed externally");
        Ok(())
    }
}
