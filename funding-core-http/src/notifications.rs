use uuid::Uuid;

use funding_core_api::domain::notification::Notification;
use funding_core_api::error::{ApiError, ApiResult};

use crate::error::ResponseExt;
use crate::wire::ListResponse;
use crate::HttpGateway;

impl HttpGateway {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn get_notifications(&self, limit: usize) -> ApiResult<Vec<Notification>> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/notifications?limit={}", self.url, limit))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response
            .json::<ListResponse<Notification>>()
            .await
            .map_err(|e| {
                ApiError::Internal(format!(
                    "unable to parse response from get_notifications: {e}"
                ))
            })?;
        Ok(body.into_items())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn patch_notification_read(&self, id: Uuid) -> ApiResult<()> {
        let token = self.bearer()?;
        self.client
            .patch(format!("{}/notifications/{}/read", self.url, id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn patch_all_notifications_read(&self) -> ApiResult<()> {
        let token = self.bearer()?;
        self.client
            .patch(format!("{}/notifications/read-all", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn delete_notification_by_id(&self, id: Uuid) -> ApiResult<()> {
        let token = self.bearer()?;
        self.client
            .delete(format!("{}/notifications/{}", self.url, id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;
        Ok(())
    }
}
