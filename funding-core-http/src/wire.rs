//! Request and response envelopes for the funding platform API. Domain
//! types serialize in their wire form directly; these shapes only add the
//! surrounding envelopes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use funding_core_api::domain::account::{AccountProfile, AccountType};
use funding_core_api::domain::investment::{InvestmentRequest, ReviewDecision};
use funding_core_api::domain::project::Project;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwitchAccountRequest {
    pub account_type: AccountType,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountsResponse {
    pub accounts: AccountsBody,
    pub user: UserBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountsBody {
    #[serde(default)]
    pub borrower: Option<AccountProfile>,
    #[serde(default)]
    pub investor: Option<AccountProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserBody {
    #[serde(default)]
    pub current_account_type: Option<AccountType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountEnvelope {
    pub account: AccountProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileEnvelope {
    pub profile: AccountProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectEnvelope {
    pub project: Project,
}

/// Project listings arrive either as a bare array or wrapped in the
/// `{ success, data }` envelope; both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Bare(Vec<T>),
    Envelope { data: Vec<T> },
}

impl<T> ListResponse<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) => items,
            ListResponse::Envelope { data } => data,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewRequest<'a> {
    pub action: ReviewDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitInvestmentRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitInvestmentResponse {
    pub project: Project,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveInvestmentResponse {
    pub request: InvestmentRequest,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    pub id: Uuid,
    #[serde(default)]
    pub admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use funding_core_api::domain::account::ProfileDetails;
    use funding_core_api::domain::investment::InvestmentStatus;
    use funding_core_api::domain::project::{ApprovalStatus, ProjectStatus, ProjectType};

    const ACCOUNTS_JSON: &str = r#"{
        "accounts": {
            "borrower": {
                "id": "7f1c6fd0-5b2a-4a5e-9a6e-3f5a9c2d1e01",
                "userId": "2b8e4c61-0f3d-4d9a-8a77-6d2f1b5c9e02",
                "complete": true,
                "accountType": "borrower",
                "profileData": {
                    "occupation": "shop owner",
                    "businessName": "Corner Sari-Sari",
                    "businessSector": "retail",
                    "monthlyIncome": "45000",
                    "hasActiveProject": true
                },
                "createdAt": "2026-01-10T08:00:00Z",
                "updatedAt": "2026-02-01T08:00:00Z"
            }
        },
        "user": { "currentAccountType": "borrower" }
    }"#;

    const PROJECT_JSON: &str = r#"{
        "id": "91d5a6b2-7c1e-4f3a-b8d9-0e2f4a6c8e03",
        "ownerId": "2b8e4c61-0f3d-4d9a-8a77-6d2f1b5c9e02",
        "status": "published",
        "approvalStatus": "approved",
        "title": "Sari-sari store expansion",
        "description": "Stock expansion and a second storefront",
        "fundingGoal": "50000",
        "projectType": "lending",
        "terms": { "interestRate": "8.5", "termMonths": 12 },
        "milestones": [
            {
                "amount": "20000",
                "percentage": "40",
                "releaseDate": "2026-10-01"
            }
        ],
        "roi": { "expectedRate": "8.5", "distribution": "monthly" },
        "payoutSchedule": { "frequency": "monthly" },
        "investmentRequests": [
            {
                "id": "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9",
                "projectId": "91d5a6b2-7c1e-4f3a-b8d9-0e2f4a6c8e03",
                "investorId": "c0ffee00-0000-4000-8000-000000000001",
                "amount": "10000",
                "submittedAt": "2026-03-01T09:30:00Z",
                "status": "pending"
            }
        ],
        "createdAt": "2026-02-15T08:00:00Z",
        "updatedAt": "2026-03-01T09:30:00Z"
    }"#;

    #[test]
    fn accounts_response_round_trips_the_profile_payload() {
        let parsed: AccountsResponse = serde_json::from_str(ACCOUNTS_JSON).unwrap();
        assert_eq!(parsed.user.current_account_type, Some(AccountType::Borrower));

        let borrower = parsed.accounts.borrower.unwrap();
        assert!(parsed.accounts.investor.is_none());
        assert_eq!(borrower.account_type(), AccountType::Borrower);
        assert!(borrower.has_active_project());
        match &borrower.details {
            ProfileDetails::Borrower(details) => {
                assert_eq!(details.business_name.as_str(), "Corner Sari-Sari");
            }
            _ => panic!("expected borrower details"),
        }
    }

    #[test]
    fn project_wire_form_carries_the_tagged_terms() {
        let project: Project = serde_json::from_str(PROJECT_JSON).unwrap();
        assert_eq!(project.status, ProjectStatus::Published);
        assert_eq!(project.approval_status, Some(ApprovalStatus::Approved));
        assert_eq!(project.project_type(), ProjectType::Lending);
        assert_eq!(project.milestones.len(), 1);
        assert_eq!(project.investment_requests.len(), 1);
        assert_eq!(
            project.investment_requests[0].status,
            InvestmentStatus::Pending
        );

        // sales is optional on the wire
        assert!(project.sales.monthly_revenue.is_none());

        let serialized = serde_json::to_value(&project).unwrap();
        assert_eq!(serialized["projectType"], "lending");
        assert_eq!(serialized["terms"]["termMonths"], 12);
        assert_eq!(serialized["status"], "published");
    }

    #[test]
    fn list_response_accepts_both_wire_shapes() {
        let bare: ListResponse<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(bare.into_items(), vec![1, 2, 3]);

        let envelope: ListResponse<u32> =
            serde_json::from_str(r#"{ "success": true, "data": [4, 5] }"#).unwrap();
        assert_eq!(envelope.into_items(), vec![4, 5]);
    }

    #[test]
    fn review_request_serializes_the_action_verb() {
        let request = ReviewRequest {
            action: ReviewDecision::Reject,
            feedback: Some("funding goal is unrealistic"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["action"], "reject");
        assert_eq!(value["feedback"], "funding goal is unrealistic");

        let request = ReviewRequest {
            action: ReviewDecision::Approve,
            feedback: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("feedback").is_none());
    }
}
