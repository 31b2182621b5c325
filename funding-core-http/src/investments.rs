use rust_decimal::Decimal;
use uuid::Uuid;

use funding_core_api::domain::investment::{InvestmentRequest, ReviewDecision};
use funding_core_api::domain::project::Project;
use funding_core_api::error::{ApiError, ApiResult};

use crate::error::ResponseExt;
use crate::wire::{
    ResolveInvestmentResponse, ReviewRequest, SubmitInvestmentRequest, SubmitInvestmentResponse,
};
use crate::HttpGateway;

impl HttpGateway {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn post_submit_investment(
        &self,
        project_id: Uuid,
        amount: Decimal,
    ) -> ApiResult<Project> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/projects/{}/investments", self.url, project_id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&SubmitInvestmentRequest { amount })
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response
            .json::<SubmitInvestmentResponse>()
            .await
            .map_err(|e| {
                ApiError::Internal(format!(
                    "unable to parse response from post_submit_investment: {e}"
                ))
            })?;
        Ok(body.project)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn post_resolve_investment(
        &self,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> ApiResult<InvestmentRequest> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/admin/investments/{}/review", self.url, request_id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&ReviewRequest {
                action: decision,
                feedback: None,
            })
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response
            .json::<ResolveInvestmentResponse>()
            .await
            .map_err(|e| {
                ApiError::Internal(format!(
                    "unable to parse response from post_resolve_investment: {e}"
                ))
            })?;
        Ok(body.request)
    }
}
