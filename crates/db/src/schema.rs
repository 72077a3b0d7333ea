use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create pursuits table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pursuits (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            password_hash VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create pursuit_members table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pursuit_members (
            pursuit_id UUID NOT NULL REFERENCES pursuits(id),
            user_id UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (pursuit_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slot_proposals table; the unique constraint enforces at most
    // one active proposal per (pursuit, member) pair
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slot_proposals (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            pursuit_id UUID NOT NULL REFERENCES pursuits(id),
            user_id UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_proposal_per_member UNIQUE (pursuit_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create proposal_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS proposal_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            proposal_id UUID NOT NULL REFERENCES slot_proposals(id) ON DELETE CASCADE,
            slot_time TIMESTAMP WITH TIME ZONE NOT NULL,
            location_type VARCHAR(32) NOT NULL,
            CONSTRAINT valid_location_type CHECK (location_type IN ('video', 'in_person'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create kickoffs table (one decided slot per pursuit)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kickoffs (
            pursuit_id UUID PRIMARY KEY REFERENCES pursuits(id),
            slot_time TIMESTAMP WITH TIME ZONE NOT NULL,
            location_type VARCHAR(32) NOT NULL,
            scheduled_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_kickoff_location_type CHECK (location_type IN ('video', 'in_person'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create notifications table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            pursuit_id UUID NOT NULL REFERENCES pursuits(id),
            kind VARCHAR(64) NOT NULL,
            body TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            dispatched_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes (one statement per query; prepared statements do not
    // allow multiple commands)
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_pursuit_members_user_id ON pursuit_members(user_id);",
        "CREATE INDEX IF NOT EXISTS idx_slot_proposals_pursuit_id ON slot_proposals(pursuit_id);",
        "CREATE INDEX IF NOT EXISTS idx_proposal_slots_proposal_id ON proposal_slots(proposal_id);",
        "CREATE INDEX IF NOT EXISTS idx_proposal_slots_slot_time ON proposal_slots(slot_time);",
        "CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id);",
        "CREATE INDEX IF NOT EXISTS idx_notifications_dispatched_at ON notifications(dispatched_at) WHERE dispatched_at IS NULL;",
    ];
    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
