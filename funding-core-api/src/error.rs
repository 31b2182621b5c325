use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::account::AccountType;
use crate::domain::project::ProjectStatus;

/// A single field-level validation failure, surfaced verbatim from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or expired credential. Surfaced at the UI boundary as a
    /// redirect to login; never retried automatically.
    #[error("authentication required")]
    Auth,

    /// Treated as an empty state for account/profile lookups, not a failure.
    #[error("not found: {0}")]
    NotFound(String),

    /// Switch to a profile type the user does not own.
    #[error("no {0} account exists for this user")]
    AccountNotFound(AccountType),

    /// The operation requires the given role profile to be current.
    #[error("operation requires the {0} account")]
    WrongAccountType(AccountType),

    /// Field-level errors in server-reported form.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// The borrower already owns a project that is neither closed nor completed.
    #[error("an active project already exists for this borrower")]
    ActiveProjectExists,

    /// An active (pending or approved) investment request from the same
    /// investor already exists on the project.
    #[error("an active investment request already exists on this project")]
    DuplicateRequest,

    #[error("a project owner cannot invest in their own project")]
    SelfInvestment,

    /// Lifecycle guard violation; the cached record is left untouched.
    #[error("cannot {event} a project in the {from} state")]
    InvalidTransition {
        from: ProjectStatus,
        event: &'static str,
    },

    /// Investment resolution applied to a request that is no longer pending.
    #[error("investment request is not pending")]
    RequestNotPending,

    #[error("network error: {0}")]
    Network(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Conflict-class errors abort the operation and surface as a
    /// user-facing message rather than a failure screen.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ApiError::ActiveProjectExists | ApiError::DuplicateRequest | ApiError::SelfInvestment
        )
    }

    pub fn validation(field: &str, message: &str) -> Self {
        ApiError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
