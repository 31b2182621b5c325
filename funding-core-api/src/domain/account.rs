use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::project::ProjectType;

/// The two mutually-exclusive role profiles a user can operate under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Borrower,
    Investor,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Borrower => write!(f, "borrower"),
            AccountType::Investor => write!(f, "investor"),
        }
    }
}

impl FromStr for AccountType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "borrower" => Ok(AccountType::Borrower),
            "investor" => Ok(AccountType::Investor),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTolerance::Conservative => write!(f, "conservative"),
            RiskTolerance::Moderate => write!(f, "moderate"),
            RiskTolerance::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            _ => Err(()),
        }
    }
}

/// Borrower-side payload: occupation and business fields, plus the
/// server-maintained active-project flag that gates new project creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerDetails {
    pub occupation: HeaplessString<100>,
    pub business_name: HeaplessString<100>,
    #[serde(default)]
    pub business_sector: Option<HeaplessString<50>>,
    #[serde(default)]
    pub monthly_income: Option<Decimal>,
    #[serde(default)]
    pub has_active_project: bool,
}

/// Investor-side payload: risk and portfolio fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorDetails {
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub portfolio_value: Option<Decimal>,
    #[serde(default)]
    pub preferred_project_types: Vec<ProjectType>,
}

/// Role-specific payload as a closed tagged variant. The profile's type is
/// derived from the variant and therefore immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "accountType", content = "profileData", rename_all = "lowercase")]
pub enum ProfileDetails {
    Borrower(BorrowerDetails),
    Investor(InvestorDetails),
}

impl ProfileDetails {
    pub fn account_type(&self) -> AccountType {
        match self {
            ProfileDetails::Borrower(_) => AccountType::Borrower,
            ProfileDetails::Investor(_) => AccountType::Investor,
        }
    }
}

/// One of the (at most two) role profiles a user owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Whether the profile has all required fields filled in.
    pub complete: bool,
    #[serde(flatten)]
    pub details: ProfileDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountProfile {
    pub fn account_type(&self) -> AccountType {
        self.details.account_type()
    }

    /// True only for a borrower profile with an active project.
    pub fn has_active_project(&self) -> bool {
        match &self.details {
            ProfileDetails::Borrower(b) => b.has_active_project,
            ProfileDetails::Investor(_) => false,
        }
    }
}

/// Partial update sent to the server, which merges it and returns the
/// canonical profile. Unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<HeaplessString<100>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<HeaplessString<100>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_sector: Option<HeaplessString<50>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tolerance: Option<RiskTolerance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_project_types: Option<Vec<ProjectType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}
