use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use kickoff_core::{
    errors::KickoffError,
    models::notification::{GetNotificationsResponse, NotificationKind, NotificationResponse},
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<GetNotificationsResponse>, AppError> {
    let rows = kickoff_db::repositories::notification::list_for_user(&state.db_pool, user_id)
        .await
        .map_err(KickoffError::Database)?;

    let mut notifications = Vec::with_capacity(rows.len());
    for row in rows {
        // An unknown kind means the stored row is corrupt
        let kind = row
            .kind
            .parse::<NotificationKind>()
            .map_err(|e| KickoffError::Internal(e.into()))?;

        notifications.push(NotificationResponse {
            id: row.id,
            pursuit_id: row.pursuit_id,
            kind,
            body: row.body,
            created_at: row.created_at,
        });
    }

    Ok(Json(GetNotificationsResponse {
        user_id,
        notifications,
    }))
}
