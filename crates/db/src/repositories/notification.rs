use crate::models::DbNotification;
use chrono::Utc;
use eyre::Result;
use kickoff_core::models::notification::NotificationKind;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Fans one notification out to every recipient in a single transaction.
/// Returns the number of rows written.
pub async fn insert_notifications(
    pool: &Pool<Postgres>,
    recipients: &[Uuid],
    pursuit_id: Uuid,
    kind: NotificationKind,
    body: &str,
) -> Result<usize> {
    if recipients.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();

    tracing::debug!(
        "Fanning out notification: pursuit_id={}, kind={}, recipients={}",
        pursuit_id,
        kind.as_str(),
        recipients.len()
    );

    let mut tx = pool.begin().await?;

    for user_id in recipients {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, pursuit_id, kind, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(pursuit_id)
        .bind(kind.as_str())
        .bind(body)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(recipients.len())
}

pub async fn list_pending(pool: &Pool<Postgres>, limit: i64) -> Result<Vec<DbNotification>> {
    let notifications = sqlx::query_as::<_, DbNotification>(
        r#"
        SELECT id, user_id, pursuit_id, kind, body, created_at, dispatched_at
        FROM notifications
        WHERE dispatched_at IS NULL
        ORDER BY created_at ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

pub async fn mark_dispatched(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        UPDATE notifications
        SET dispatched_at = $2
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_for_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbNotification>> {
    let notifications = sqlx::query_as::<_, DbNotification>(
        r#"
        SELECT id, user_id, pursuit_id, kind, body, created_at, dispatched_at
        FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}
