use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ProposalSubmitted,
    KickoffScheduled,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ProposalSubmitted => "proposal_submitted",
            NotificationKind::KickoffScheduled => "kickoff_scheduled",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposal_submitted" => Ok(NotificationKind::ProposalSubmitted),
            "kickoff_scheduled" => Ok(NotificationKind::KickoffScheduled),
            other => Err(format!("Unknown notification kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pursuit_id: Uuid,
    pub kind: NotificationKind,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub pursuit_id: Uuid,
    pub kind: NotificationKind,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNotificationsResponse {
    pub user_id: Uuid,
    pub notifications: Vec<NotificationResponse>,
}
