use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use funding_core_api::domain::notification::{Notification, NotificationType};
use funding_core_api::error::{ApiError, ApiResult};
use funding_core_api::service::NotificationService;

use crate::gateway::FundingGateway;
use crate::session::TokenSession;

pub const NOTIFICATION_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const NOTIFICATION_FETCH_LIMIT: usize = 50;

#[derive(Default)]
struct NotificationState {
    items: Vec<Notification>,
    loaded: bool,
    /// team_update ids that already fired the permission-refresh signal,
    /// so repeated polls do not re-fire for the same notification.
    signalled_team_updates: HashSet<Uuid>,
}

/// Poll-based notification surface. Refreshes on a fixed interval plus
/// on demand (callers re-trigger `refresh` on focus); failures are logged
/// and never propagate into the account/project core.
pub struct NotificationStore {
    session: Arc<TokenSession>,
    gateway: Arc<dyn FundingGateway>,
    state: RwLock<NotificationState>,
    permission_listeners: RwLock<Vec<Box<dyn Fn() + Send + Sync>>>,
}

impl NotificationStore {
    pub fn new(session: Arc<TokenSession>, gateway: Arc<dyn FundingGateway>) -> Self {
        Self {
            session,
            gateway,
            state: RwLock::new(NotificationState::default()),
            permission_listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback fired when an unread team_update notification
    /// is first observed. Dependent components subscribe explicitly
    /// instead of listening to an ambient broadcast.
    pub fn subscribe_permission_refresh<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.permission_listeners.write().push(Box::new(listener));
    }

    /// Start the 60-second poll; the task is registered with the session
    /// and aborted on teardown.
    pub fn spawn_poll_task(self: &Arc<Self>) {
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(NOTIFICATION_POLL_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(error) = store.refresh().await {
                    tracing::warn!(%error, "notification poll failed");
                }
            }
        });
        self.session.register_task(handle.abort_handle());
    }

    fn fire_permission_refresh(&self) {
        for listener in self.permission_listeners.read().iter() {
            listener();
        }
    }
}

#[async_trait]
impl NotificationService for NotificationStore {
    async fn refresh(&self) -> ApiResult<Vec<Notification>> {
        if !self.session.is_authenticated() {
            return Ok(Vec::new());
        }

        let items = match self
            .gateway
            .fetch_notifications(NOTIFICATION_FETCH_LIMIT)
            .await
        {
            Ok(items) => items,
            Err(ApiError::Network(error)) if self.state.read().loaded => {
                tracing::warn!(%error, "notification fetch failed, serving cached snapshot");
                return Ok(self.notifications());
            }
            Err(e) => return Err(e),
        };

        let fire = {
            let mut state = self.state.write();
            // keep the dedup set bounded by the current page
            let page: HashSet<Uuid> = items.iter().map(|n| n.id).collect();
            state.signalled_team_updates.retain(|id| page.contains(id));
            let mut fire = false;
            for item in &items {
                if item.notification_type == NotificationType::TeamUpdate
                    && !item.read
                    && state.signalled_team_updates.insert(item.id)
                {
                    fire = true;
                }
            }
            state.items = items.clone();
            state.loaded = true;
            fire
        };
        if fire {
            self.fire_permission_refresh();
        }
        Ok(items)
    }

    async fn mark_as_read(&self, id: Uuid) -> ApiResult<()> {
        {
            let mut state = self.state.write();
            match state.items.iter_mut().find(|n| n.id == id) {
                Some(item) if !item.read => item.read = true,
                Some(_) => return Ok(()),
                None => return Err(ApiError::NotFound(format!("notification {id}"))),
            }
        }

        // optimistic flip already applied; roll back if the server refuses
        if let Err(e) = self.gateway.mark_notification_read(id).await {
            let mut state = self.state.write();
            if let Some(item) = state.items.iter_mut().find(|n| n.id == id) {
                item.read = false;
            }
            return Err(e);
        }
        Ok(())
    }

    async fn mark_all_as_read(&self) -> ApiResult<()> {
        let prior: Vec<(Uuid, bool)> = {
            let mut state = self.state.write();
            let prior = state.items.iter().map(|n| (n.id, n.read)).collect();
            for item in state.items.iter_mut() {
                item.read = true;
            }
            prior
        };

        if let Err(e) = self.gateway.mark_all_notifications_read().await {
            let mut state = self.state.write();
            for (id, read) in prior {
                if let Some(item) = state.items.iter_mut().find(|n| n.id == id) {
                    item.read = read;
                }
            }
            return Err(e);
        }
        Ok(())
    }

    async fn delete_notification(&self, id: Uuid) -> ApiResult<()> {
        // removed locally only after server confirmation
        self.gateway.delete_notification(id).await?;
        self.state.write().items.retain(|n| n.id != id);
        Ok(())
    }

    fn notifications(&self) -> Vec<Notification> {
        self.state.read().items.clone()
    }

    fn unread_count(&self) -> usize {
        self.state.read().items.iter().filter(|n| !n.read).count()
    }
}
