use chrono::{DateTime, Utc};
use kickoff_core::models::{
    notification::NotificationKind,
    proposal::{LocationType, ProposedSlot, TimeSlotProposal},
};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbKickoff, DbNotification, DbPursuit, DbPursuitMember, DbSlotProposal};

// Mock repositories for testing
mock! {
    pub PursuitRepo {
        pub async fn create_pursuit(
            &self,
            name: &'static str,
            password_hash: Option<&'static str>,
        ) -> eyre::Result<DbPursuit>;

        pub async fn get_pursuit_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbPursuit>>;

        pub async fn add_member(
            &self,
            pursuit_id: Uuid,
            user_id: Uuid,
        ) -> eyre::Result<DbPursuitMember>;

        pub async fn get_members(
            &self,
            pursuit_id: Uuid,
        ) -> eyre::Result<Vec<DbPursuitMember>>;

        pub async fn verify_password(
            &self,
            id: Uuid,
            password: &'static str,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub ProposalRepo {
        pub async fn submit_proposal(
            &self,
            pursuit_id: Uuid,
            user_id: Uuid,
            slots: Vec<ProposedSlot>,
        ) -> eyre::Result<DbSlotProposal>;

        pub async fn get_proposals_by_pursuit_id(
            &self,
            pursuit_id: Uuid,
        ) -> eyre::Result<Vec<TimeSlotProposal>>;
    }
}

mock! {
    pub KickoffRepo {
        pub async fn schedule_kickoff(
            &self,
            pursuit_id: Uuid,
            slot_time: DateTime<Utc>,
            location_type: LocationType,
        ) -> eyre::Result<DbKickoff>;

        pub async fn get_kickoff_by_pursuit_id(
            &self,
            pursuit_id: Uuid,
        ) -> eyre::Result<Option<DbKickoff>>;
    }
}

mock! {
    pub NotificationRepo {
        pub async fn insert_notifications(
            &self,
            recipients: Vec<Uuid>,
            pursuit_id: Uuid,
            kind: NotificationKind,
            body: &'static str,
        ) -> eyre::Result<usize>;

        pub async fn list_pending(
            &self,
            limit: i64,
        ) -> eyre::Result<Vec<DbNotification>>;

        pub async fn mark_dispatched(
            &self,
            ids: Vec<Uuid>,
        ) -> eyre::Result<()>;

        pub async fn list_for_user(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Vec<DbNotification>>;
    }
}
