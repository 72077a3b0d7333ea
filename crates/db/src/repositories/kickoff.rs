use crate::models::DbKickoff;
use chrono::{DateTime, Utc};
use eyre::Result;
use kickoff_core::models::proposal::LocationType;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn schedule_kickoff(
    pool: &Pool<Postgres>,
    pursuit_id: Uuid,
    slot_time: DateTime<Utc>,
    location_type: LocationType,
) -> Result<DbKickoff> {
    let now = Utc::now();

    tracing::debug!(
        "Scheduling kickoff: pursuit_id={}, slot_time={}, location_type={}",
        pursuit_id,
        slot_time,
        location_type.as_str()
    );

    let kickoff = sqlx::query_as::<_, DbKickoff>(
        r#"
        INSERT INTO kickoffs (pursuit_id, slot_time, location_type, scheduled_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (pursuit_id)
        DO UPDATE SET slot_time = $2, location_type = $3, scheduled_at = $4
        RETURNING pursuit_id, slot_time, location_type, scheduled_at
        "#,
    )
    .bind(pursuit_id)
    .bind(slot_time)
    .bind(location_type.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(kickoff)
}

pub async fn get_kickoff_by_pursuit_id(
    pool: &Pool<Postgres>,
    pursuit_id: Uuid,
) -> Result<Option<DbKickoff>> {
    let kickoff = sqlx::query_as::<_, DbKickoff>(
        r#"
        SELECT pursuit_id, slot_time, location_type, scheduled_at
        FROM kickoffs
        WHERE pursuit_id = $1
        "#,
    )
    .bind(pursuit_id)
    .fetch_optional(pool)
    .await?;

    Ok(kickoff)
}
