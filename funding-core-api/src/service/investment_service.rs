use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::investment::{InvestmentRequest, ReviewDecision};
use crate::error::ApiResult;

/// Investment request lifecycle, embedded per project.
#[async_trait]
pub trait InvestmentService: Send + Sync {
    /// Submit a pending request as the current identity.
    ///
    /// Fails with `ApiError::SelfInvestment` when the requester owns the
    /// project and with `ApiError::DuplicateRequest` when an active
    /// (pending or approved) request from the same investor already exists
    /// on that project, checked against the latest loaded state before the
    /// request is sent.
    async fn submit_investment(
        &self,
        project_id: Uuid,
        amount: Decimal,
    ) -> ApiResult<InvestmentRequest>;

    /// Admin-only: pending → approved | rejected. The only path to a
    /// terminal state besides an externally reported payment failure.
    async fn resolve_investment(
        &self,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> ApiResult<InvestmentRequest>;

    /// Apply an externally reported payment/processing failure to the
    /// cached record. Not a client decision path.
    fn record_investment_failure(&self, request_id: Uuid) -> ApiResult<()>;
}
