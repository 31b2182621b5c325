use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use uuid::Uuid;

/// Server-assigned event tags. Unrecognized tags from newer servers map to
/// `Unknown` at the wire boundary instead of failing the whole fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ProjectApproved,
    ProjectRejected,
    InvestmentSubmitted,
    InvestmentApproved,
    InvestmentRejected,
    TopupRejected,
    TeamUpdate,
    Unknown,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::ProjectApproved => write!(f, "project_approved"),
            NotificationType::ProjectRejected => write!(f, "project_rejected"),
            NotificationType::InvestmentSubmitted => write!(f, "investment_submitted"),
            NotificationType::InvestmentApproved => write!(f, "investment_approved"),
            NotificationType::InvestmentRejected => write!(f, "investment_rejected"),
            NotificationType::TopupRejected => write!(f, "topup_rejected"),
            NotificationType::TeamUpdate => write!(f, "team_update"),
            NotificationType::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for NotificationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project_approved" => Ok(NotificationType::ProjectApproved),
            "project_rejected" => Ok(NotificationType::ProjectRejected),
            "investment_submitted" => Ok(NotificationType::InvestmentSubmitted),
            "investment_approved" => Ok(NotificationType::InvestmentApproved),
            "investment_rejected" => Ok(NotificationType::InvestmentRejected),
            "topup_rejected" => Ok(NotificationType::TopupRejected),
            "team_update" => Ok(NotificationType::TeamUpdate),
            _ => Err(()),
        }
    }
}

pub fn serialize_notification_type<S>(
    value: &NotificationType,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize_notification_type<'de, D>(deserializer: D) -> Result<NotificationType, D::Error>
where
    D: Deserializer<'de>,
{
    let value_str = String::deserialize(deserializer)?;
    Ok(NotificationType::from_str(&value_str).unwrap_or(NotificationType::Unknown))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedRequestType {
    Project,
    Investment,
    Topup,
}

/// Created by server-side transitions; the client only mutates read state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(
        rename = "type",
        serialize_with = "serialize_notification_type",
        deserialize_with = "deserialize_notification_type"
    )]
    pub notification_type: NotificationType,
    pub read: bool,
    #[serde(default)]
    pub related_request_id: Option<Uuid>,
    #[serde(default)]
    pub related_request_type: Option<RelatedRequestType>,
    pub created_at: DateTime<Utc>,
}
