use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Pending,
    Approved,
    Rejected,
    /// Payment/processing failure, applied as an external event.
    Failed,
}

impl std::fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestmentStatus::Pending => write!(f, "pending"),
            InvestmentStatus::Approved => write!(f, "approved"),
            InvestmentStatus::Rejected => write!(f, "rejected"),
            InvestmentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for InvestmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvestmentStatus::Pending),
            "approved" => Ok(InvestmentStatus::Approved),
            "rejected" => Ok(InvestmentStatus::Rejected),
            "failed" => Ok(InvestmentStatus::Failed),
            _ => Err(()),
        }
    }
}

/// An investor's request against another user's project. Append-only until
/// resolved; rejected entries are retained for audit, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRequest {
    pub id: Uuid,
    pub project_id: Uuid,
    pub investor_id: Uuid,
    pub amount: Decimal,
    pub submitted_at: DateTime<Utc>,
    pub status: InvestmentStatus,
}

impl InvestmentRequest {
    /// Active requests block a second submission from the same investor.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            InvestmentStatus::Pending | InvestmentStatus::Approved
        )
    }
}

/// Admin verdict for project reviews and investment resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewDecision::Approve => write!(f, "approve"),
            ReviewDecision::Reject => write!(f, "reject"),
        }
    }
}
