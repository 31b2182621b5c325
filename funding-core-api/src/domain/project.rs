use chrono::{DateTime, NaiveDate, Utc};
use heapless::String as HeaplessString;
use heapless::Vec as HeaplessVec;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::investment::InvestmentRequest;
use crate::error::{ApiError, ApiResult};

/// Upper bound on milestones per project, enforced by the container type.
pub const MAX_MILESTONES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Lending,
    Equity,
    Donation,
    Rewards,
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectType::Lending => write!(f, "lending"),
            ProjectType::Equity => write!(f, "equity"),
            ProjectType::Donation => write!(f, "donation"),
            ProjectType::Rewards => write!(f, "rewards"),
        }
    }
}

impl FromStr for ProjectType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lending" => Ok(ProjectType::Lending),
            "equity" => Ok(ProjectType::Equity),
            "donation" => Ok(ProjectType::Donation),
            "rewards" => Ok(ProjectType::Rewards),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Published,
    Completed,
    Closed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Draft => write!(f, "draft"),
            ProjectStatus::Published => write!(f, "published"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "published" => Ok(ProjectStatus::Published),
            "completed" => Ok(ProjectStatus::Completed),
            "closed" => Ok(ProjectStatus::Closed),
            _ => Err(()),
        }
    }
}

/// Orthogonal review dimension, meaningful only once a project is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// Reference to a stored image blob; upload mechanics live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub id: Uuid,
    pub url: HeaplessString<255>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTier {
    pub pledge_amount: Decimal,
    pub reward: HeaplessString<200>,
}

/// Type-specific funding terms, a closed set of shapes rather than an
/// open-ended field bag. The project type is derived from the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "projectType", content = "terms", rename_all = "lowercase")]
pub enum FundingTerms {
    #[serde(rename_all = "camelCase")]
    Lending {
        interest_rate: Decimal,
        term_months: u32,
    },
    #[serde(rename_all = "camelCase")]
    Equity {
        valuation: Decimal,
        equity_offered_pct: Decimal,
    },
    Donation {
        cause: HeaplessString<100>,
    },
    #[serde(rename_all = "camelCase")]
    Rewards {
        reward_tiers: Vec<RewardTier>,
    },
}

impl FundingTerms {
    pub fn project_type(&self) -> ProjectType {
        match self {
            FundingTerms::Lending { .. } => ProjectType::Lending,
            FundingTerms::Equity { .. } => ProjectType::Equity,
            FundingTerms::Donation { .. } => ProjectType::Donation,
            FundingTerms::Rewards { .. } => ProjectType::Rewards,
        }
    }
}

/// Free-form business fields common to all project types, plus the tagged
/// per-type terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub title: HeaplessString<100>,
    pub description: HeaplessString<500>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    pub funding_goal: Decimal,
    #[serde(flatten)]
    pub terms: FundingTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub amount: Decimal,
    /// Percentage of the total funding released at this milestone.
    pub percentage: Decimal,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub evidence_image: Option<ImageRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutFrequency {
    Monthly,
    Quarterly,
    OnCompletion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiTerms {
    pub expected_rate: Decimal,
    pub distribution: PayoutFrequency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    #[serde(default)]
    pub monthly_revenue: Option<Decimal>,
    #[serde(default)]
    pub monthly_units: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSchedule {
    pub frequency: PayoutFrequency,
    #[serde(default)]
    pub first_payout_date: Option<NaiveDate>,
}

/// A funded project owned exclusively by its creating borrower and
/// referenced, never owned, by investors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: ProjectStatus,
    /// None until the project is published.
    #[serde(default)]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(flatten)]
    pub details: ProjectDetails,
    pub milestones: HeaplessVec<Milestone, MAX_MILESTONES>,
    pub roi: RoiTerms,
    #[serde(default)]
    pub sales: SalesRecord,
    pub payout_schedule: PayoutSchedule,
    #[serde(default)]
    pub investment_requests: Vec<InvestmentRequest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn project_type(&self) -> ProjectType {
        self.details.terms.project_type()
    }

    /// Closed and completed projects are excluded from active-project counts.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, ProjectStatus::Closed | ProjectStatus::Completed)
    }

    /// The at-most-one active (pending or approved) request from an investor.
    pub fn active_request_for(&self, investor_id: Uuid) -> Option<&InvestmentRequest> {
        self.investment_requests
            .iter()
            .find(|r| r.investor_id == investor_id && r.is_active())
    }

    pub fn request(&self, request_id: Uuid) -> Option<&InvestmentRequest> {
        self.investment_requests.iter().find(|r| r.id == request_id)
    }
}

/// Payload for creating a new draft project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(flatten)]
    pub details: ProjectDetails,
    pub milestones: HeaplessVec<Milestone, MAX_MILESTONES>,
    pub roi: RoiTerms,
    #[serde(default)]
    pub sales: SalesRecord,
    pub payout_schedule: PayoutSchedule,
}

/// Partial update; the server deep-merges and returns the canonical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<HeaplessString<100>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<HeaplessString<500>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_goal: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<FundingTerms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<HeaplessVec<Milestone, MAX_MILESTONES>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<RoiTerms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<SalesRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_schedule: Option<PayoutSchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

/// Milestone percentages may not release more than the full funding amount.
pub fn validate_milestones(milestones: &[Milestone]) -> ApiResult<()> {
    let total: Decimal = milestones.iter().map(|m| m.percentage).sum();
    if total > Decimal::from(100) {
        return Err(ApiError::validation(
            "milestones",
            "milestone percentages exceed 100",
        ));
    }
    Ok(())
}
