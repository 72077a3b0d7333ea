//! # Kickoff Handlers
//!
//! This module contains handlers for ranking proposed kickoff slots and for
//! recording the decided kickoff time of a pursuit.
//!
//! ## Ranking
//!
//! The ranking endpoint loads the current proposal snapshot for a pursuit
//! and delegates to [`kickoff_core::scheduling::rank_slots`], which tallies
//! every distinct `(datetime, location_type)` pair across the proposals and
//! orders the candidates by popularity with a deterministic tie-break. The
//! handler only trims the ranked list to the requested count; all counting
//! and ordering semantics live in the core crate.
//!
//! ## Scheduling
//!
//! Deciding the kickoff is gated by the pursuit password when one is set.
//! The caller may name an explicit slot or let the top-ranked candidate win;
//! either way every member is notified of the decision.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use kickoff_core::{
    errors::KickoffError,
    models::{
        kickoff::{RankingResponse, ScheduleKickoffRequest, ScheduleKickoffResponse},
        notification::NotificationKind,
        proposal::ProposedSlot,
    },
    scheduling,
};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth, error_handling::AppError},
};

/// Query parameters for the ranking endpoint
#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    /// Maximum number of ranked slots to return
    pub count: Option<usize>,
}

/// Returns the ranked candidate kickoff slots for a pursuit
///
/// # Endpoint
///
/// ```text
/// GET /api/pursuits/:id/kickoff/ranking?count=5
/// ```
///
/// An empty slot list means no member has submitted availability yet; that
/// is a valid empty state, not an error.
#[axum::debug_handler]
pub async fn get_ranking(
    State(state): State<Arc<ApiState>>,
    Path(pursuit_id): Path<Uuid>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse>, AppError> {
    let count = query.count.unwrap_or(5);

    // Ensure the pursuit exists
    kickoff_db::repositories::pursuit::get_pursuit_by_id(&state.db_pool, pursuit_id)
        .await
        .map_err(KickoffError::Database)?
        .ok_or_else(|| {
            KickoffError::NotFound(format!("Pursuit with ID {} not found", pursuit_id))
        })?;

    // Load the proposal snapshot and rank it
    let proposals =
        kickoff_db::repositories::proposal::get_proposals_by_pursuit_id(&state.db_pool, pursuit_id)
            .await
            .map_err(KickoffError::Database)?;

    let mut slots = scheduling::rank_slots(&proposals);
    slots.truncate(count);

    Ok(Json(RankingResponse { pursuit_id, slots }))
}

/// Decides the kickoff slot for a pursuit
///
/// # Endpoint
///
/// ```text
/// POST /api/pursuits/:id/kickoff
/// ```
///
/// When the request body names a slot, that slot is recorded; otherwise the
/// top-ranked candidate from the current proposals is used. Scheduling
/// requires the pursuit password when one is set, and fails with a
/// validation error when no slot was named and no proposals exist to rank.
#[axum::debug_handler]
pub async fn schedule_kickoff(
    State(state): State<Arc<ApiState>>,
    Path(pursuit_id): Path<Uuid>,
    Json(payload): Json<ScheduleKickoffRequest>,
) -> Result<Json<ScheduleKickoffResponse>, AppError> {
    let db_pursuit =
        kickoff_db::repositories::pursuit::get_pursuit_by_id(&state.db_pool, pursuit_id)
            .await
            .map_err(KickoffError::Database)?
            .ok_or_else(|| {
                KickoffError::NotFound(format!("Pursuit with ID {} not found", pursuit_id))
            })?;

    // Verify password if provided
    if let Some(password) = &payload.password {
        let is_valid = auth::verify_pursuit_password(&state.db_pool, pursuit_id, password)
            .await
            .map_err(KickoffError::Database)?;

        if !is_valid {
            return Err(AppError(KickoffError::Authentication(
                "Invalid password".to_string(),
            )));
        }
    } else if db_pursuit.password_hash.is_some() {
        return Err(AppError(KickoffError::Authentication(
            "Password required to schedule this kickoff".to_string(),
        )));
    }

    // Resolve the slot: explicit choice wins, otherwise the top-ranked one
    let chosen = match &payload.slot {
        Some(choice) => ProposedSlot::new(choice.datetime, choice.location_type),
        None => {
            let proposals = kickoff_db::repositories::proposal::get_proposals_by_pursuit_id(
                &state.db_pool,
                pursuit_id,
            )
            .await
            .map_err(KickoffError::Database)?;

            let top = scheduling::top_slot(&proposals).ok_or_else(|| {
                KickoffError::Validation(
                    "No proposals submitted; cannot pick a kickoff slot".to_string(),
                )
            })?;
            ProposedSlot::new(top.datetime, top.location_type)
        }
    };

    let db_kickoff = kickoff_db::repositories::kickoff::schedule_kickoff(
        &state.db_pool,
        pursuit_id,
        chosen.datetime,
        chosen.location_type,
    )
    .await
    .map_err(KickoffError::Database)?;

    // Fan out the decision to every member
    let members = kickoff_db::repositories::pursuit::get_members(&state.db_pool, pursuit_id)
        .await
        .map_err(KickoffError::Database)?;
    let recipients: Vec<Uuid> = members.into_iter().map(|m| m.user_id).collect();

    let body = format!(
        "Kickoff for \"{}\" scheduled at {} ({})",
        db_pursuit.name,
        db_kickoff.slot_time.to_rfc3339(),
        chosen.location_type.as_str()
    );
    kickoff_db::repositories::notification::insert_notifications(
        &state.db_pool,
        &recipients,
        pursuit_id,
        NotificationKind::KickoffScheduled,
        &body,
    )
    .await
    .map_err(KickoffError::Database)?;

    let response = ScheduleKickoffResponse {
        pursuit_id,
        datetime: db_kickoff.slot_time,
        location_type: chosen.location_type,
        scheduled_at: db_kickoff.scheduled_at,
    };

    Ok(Json(response))
}
