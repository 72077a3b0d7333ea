use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::proposal::{AggregatedSlot, LocationType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResponse {
    pub pursuit_id: Uuid,
    pub slots: Vec<AggregatedSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotChoice {
    pub datetime: DateTime<Utc>,
    pub location_type: LocationType,
}

/// Request body for deciding a pursuit's kickoff. When `slot` is omitted the
/// top-ranked candidate is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleKickoffRequest {
    pub slot: Option<SlotChoice>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleKickoffResponse {
    pub pursuit_id: Uuid,
    pub datetime: DateTime<Utc>,
    pub location_type: LocationType,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickoffDetails {
    pub datetime: DateTime<Utc>,
    pub location_type: LocationType,
    pub scheduled_at: DateTime<Utc>,
}
