use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notification::Notification;
use crate::error::ApiResult;

/// Poll-driven notification surface. Failures here must never block or
/// break the account/project core.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Replace the local list with the latest server page.
    async fn refresh(&self) -> ApiResult<Vec<Notification>>;

    /// Optimistic local flip confirmed server-side; rolled back on failure.
    async fn mark_as_read(&self, id: Uuid) -> ApiResult<()>;

    /// Optimistic bulk flip confirmed server-side; rolled back on failure.
    async fn mark_all_as_read(&self) -> ApiResult<()>;

    /// Removed locally only after server confirmation.
    async fn delete_notification(&self, id: Uuid) -> ApiResult<()>;

    fn notifications(&self) -> Vec<Notification>;

    fn unread_count(&self) -> usize;
}
