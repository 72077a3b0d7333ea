use crate::models::{DbProposalSlot, DbSlotProposal};
use chrono::Utc;
use eyre::{Result, eyre};
use kickoff_core::models::proposal::{LocationType, ProposedSlot, TimeSlotProposal};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Stores a member's availability for a pursuit, replacing any proposal the
/// member submitted before. Delete and insert run in one transaction so the
/// one-proposal-per-member invariant holds even under concurrent resubmits.
pub async fn submit_proposal(
    pool: &Pool<Postgres>,
    pursuit_id: Uuid,
    user_id: Uuid,
    slots: &[ProposedSlot],
) -> Result<DbSlotProposal> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Submitting proposal: pursuit_id={}, user_id={}, slots={}",
        pursuit_id,
        user_id,
        slots.len()
    );

    let mut tx = pool.begin().await?;

    // Resubmission replaces, never appends; slots cascade with the row
    sqlx::query(
        r#"
        DELETE FROM slot_proposals
        WHERE pursuit_id = $1 AND user_id = $2
        "#,
    )
    .bind(pursuit_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let proposal = sqlx::query_as::<_, DbSlotProposal>(
        r#"
        INSERT INTO slot_proposals (id, pursuit_id, user_id, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, pursuit_id, user_id, created_at
        "#,
    )
    .bind(id)
    .bind(pursuit_id)
    .bind(user_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for slot in slots {
        sqlx::query(
            r#"
            INSERT INTO proposal_slots (id, proposal_id, slot_time, location_type)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(proposal.id)
        .bind(slot.datetime)
        .bind(slot.location_type.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!("Proposal stored: id={}", proposal.id);
    Ok(proposal)
}

/// Loads the current proposal snapshot for a pursuit as domain values ready
/// for ranking.
pub async fn get_proposals_by_pursuit_id(
    pool: &Pool<Postgres>,
    pursuit_id: Uuid,
) -> Result<Vec<TimeSlotProposal>> {
    let rows = sqlx::query_as::<_, DbSlotProposal>(
        r#"
        SELECT id, pursuit_id, user_id, created_at
        FROM slot_proposals
        WHERE pursuit_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(pursuit_id)
    .fetch_all(pool)
    .await?;

    let mut proposals = Vec::with_capacity(rows.len());
    for row in rows {
        let slot_rows = sqlx::query_as::<_, DbProposalSlot>(
            r#"
            SELECT id, proposal_id, slot_time, location_type
            FROM proposal_slots
            WHERE proposal_id = $1
            ORDER BY slot_time ASC
            "#,
        )
        .bind(row.id)
        .fetch_all(pool)
        .await?;

        let mut proposed_slots = Vec::with_capacity(slot_rows.len());
        for slot_row in slot_rows {
            let location_type = slot_row
                .location_type
                .parse::<LocationType>()
                .map_err(|e| eyre!(e))?;
            proposed_slots.push(ProposedSlot::new(slot_row.slot_time, location_type));
        }

        proposals.push(TimeSlotProposal {
            pursuit_id: row.pursuit_id,
            user_id: row.user_id,
            proposed_slots,
            created_at: row.created_at,
        });
    }

    Ok(proposals)
}
