use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Meeting modality for a proposed slot.
///
/// The variant order matters: `Video` sorts before `InPerson`, which is the
/// final tie-break when ranking aggregated slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Video,
    InPerson,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Video => "video",
            LocationType::InPerson => "in_person",
        }
    }
}

impl std::str::FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(LocationType::Video),
            "in_person" => Ok(LocationType::InPerson),
            other => Err(format!("Unknown location type: {}", other)),
        }
    }
}

/// A single candidate meeting option: an instant plus a modality.
///
/// Two slots are the same slot only when their normalized `(datetime,
/// location_type)` pairs compare equal. Normalization truncates to whole
/// seconds in UTC so that clients submitting the same instant at different
/// precisions cannot fragment a slot into several keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposedSlot {
    pub datetime: DateTime<Utc>,
    pub location_type: LocationType,
}

impl ProposedSlot {
    pub fn new(datetime: DateTime<Utc>, location_type: LocationType) -> Self {
        Self {
            datetime: datetime.with_nanosecond(0).unwrap_or(datetime),
            location_type,
        }
    }
}

/// One member's availability submission for a pursuit.
///
/// At most one proposal is active per (`pursuit_id`, `user_id`) pair; a
/// resubmission replaces the prior proposal rather than adding a second one.
/// That invariant is enforced by the proposal store, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotProposal {
    pub pursuit_id: Uuid,
    pub user_id: Uuid,
    pub proposed_slots: Vec<ProposedSlot>,
    pub created_at: DateTime<Utc>,
}

/// A distinct `(datetime, location_type)` pair with the number of times it
/// was proposed. Derived by [`crate::scheduling::rank_slots`]; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSlot {
    pub datetime: DateTime<Utc>,
    pub location_type: LocationType,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedSlotRequest {
    pub datetime: DateTime<Utc>,
    pub location_type: LocationType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitProposalRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub slots: Vec<ProposedSlotRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitProposalResponse {
    pub pursuit_id: Uuid,
    pub user_id: Uuid,
    pub slot_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalResponse {
    pub user_id: Uuid,
    pub slots: Vec<ProposedSlot>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProposalsResponse {
    pub pursuit_id: Uuid,
    pub proposals: Vec<ProposalResponse>,
}
