use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use uuid::Uuid;

use funding_core_api::error::{ApiError, ApiResult};

use crate::gateway::FundingGateway;

/// Credentials are replaced on a fixed cadence, independent of any request.
pub const TOKEN_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// The authenticated person behind this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct BearerToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    token: Option<BearerToken>,
}

/// Holds the authenticated identity and bearer credential, and owns the
/// background timers registered against this session. Leaf dependency for
/// all network calls.
pub struct TokenSession {
    state: RwLock<SessionState>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl TokenSession {
    /// An unauthenticated session; stores fall into their empty states.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn authenticated(identity: Identity, token: BearerToken) -> Self {
        Self {
            state: RwLock::new(SessionState {
                identity: Some(identity),
                token: Some(token),
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Install credentials after an external login flow.
    pub fn install(&self, identity: Identity, token: BearerToken) {
        let mut state = self.state.write();
        state.identity = Some(identity);
        state.token = Some(token);
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.read().identity
    }

    pub fn user_id(&self) -> ApiResult<Uuid> {
        self.state
            .read()
            .identity
            .map(|i| i.user_id)
            .ok_or(ApiError::Auth)
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().identity.map(|i| i.admin).unwrap_or(false)
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state.read();
        match (&state.identity, &state.token) {
            (Some(_), Some(token)) => !token.is_expired(),
            _ => false,
        }
    }

    /// Current credential for the Authorization header.
    pub fn bearer(&self) -> ApiResult<String> {
        let state = self.state.read();
        match &state.token {
            Some(token) if !token.is_expired() => Ok(token.token.clone()),
            _ => Err(ApiError::Auth),
        }
    }

    /// Replace the credential with a fresh one from the server.
    pub async fn refresh(&self, gateway: &dyn FundingGateway) -> ApiResult<()> {
        let token = gateway.refresh_token().await?;
        self.state.write().token = Some(token);
        Ok(())
    }

    /// Start the 30-minute credential refresh interval. The task is
    /// registered with this session and aborted on `close`.
    pub fn spawn_refresh_task(self: &Arc<Self>, gateway: Arc<dyn FundingGateway>) {
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TOKEN_REFRESH_INTERVAL);
            // the first tick fires immediately; the installed token is fresh
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(error) = session.refresh(gateway.as_ref()).await {
                    tracing::warn!(%error, "credential refresh failed");
                }
            }
        });
        self.register_task(handle.abort_handle());
    }

    /// Register a background task to be aborted on session teardown.
    pub fn register_task(&self, handle: AbortHandle) {
        self.tasks.lock().push(handle);
    }

    /// Teardown: abort every registered timer and drop the credentials.
    pub fn close(&self) {
        for handle in self.tasks.lock().drain(..) {
            handle.abort();
        }
        let mut state = self.state.write();
        state.identity = None;
        state.token = None;
    }
}

impl Default for TokenSession {
    fn default() -> Self {
        Self::new()
    }
}
