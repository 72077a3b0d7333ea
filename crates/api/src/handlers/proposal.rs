use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use kickoff_core::{
    errors::KickoffError,
    models::{
        notification::NotificationKind,
        proposal::{
            GetProposalsResponse, ProposalResponse, ProposedSlot, SubmitProposalRequest,
            SubmitProposalResponse,
        },
    },
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Submits a member's availability for a pursuit.
///
/// A member has at most one active proposal per pursuit: resubmitting
/// replaces the prior proposal, it never appends a second one. The other
/// members are notified that a new proposal arrived.
#[axum::debug_handler]
pub async fn submit_proposal(
    State(state): State<Arc<ApiState>>,
    Path(pursuit_id): Path<Uuid>,
    Json(payload): Json<SubmitProposalRequest>,
) -> Result<Json<SubmitProposalResponse>, AppError> {
    // Ensure the pursuit exists
    let db_pursuit =
        kickoff_db::repositories::pursuit::get_pursuit_by_id(&state.db_pool, pursuit_id)
            .await
            .map_err(KickoffError::Database)?
            .ok_or_else(|| {
                KickoffError::NotFound(format!("Pursuit with ID {} not found", pursuit_id))
            })?;

    // Normalize every submitted slot to the canonical instant representation
    let slots: Vec<ProposedSlot> = payload
        .slots
        .iter()
        .map(|s| ProposedSlot::new(s.datetime, s.location_type))
        .collect();

    let db_proposal = kickoff_db::repositories::proposal::submit_proposal(
        &state.db_pool,
        pursuit_id,
        payload.user_id,
        &slots,
    )
    .await
    .map_err(KickoffError::Database)?;

    // Fan out a notification to every other member of the pursuit
    let members = kickoff_db::repositories::pursuit::get_members(&state.db_pool, pursuit_id)
        .await
        .map_err(KickoffError::Database)?;

    let recipients: Vec<Uuid> = members
        .into_iter()
        .map(|m| m.user_id)
        .filter(|user_id| *user_id != payload.user_id)
        .collect();

    let body = format!(
        "A member submitted {} kickoff time(s) for \"{}\"",
        slots.len(),
        db_pursuit.name
    );
    kickoff_db::repositories::notification::insert_notifications(
        &state.db_pool,
        &recipients,
        pursuit_id,
        NotificationKind::ProposalSubmitted,
        &body,
    )
    .await
    .map_err(KickoffError::Database)?;

    let response = SubmitProposalResponse {
        pursuit_id,
        user_id: payload.user_id,
        slot_count: slots.len(),
        created_at: db_proposal.created_at,
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_proposals(
    State(state): State<Arc<ApiState>>,
    Path(pursuit_id): Path<Uuid>,
) -> Result<Json<GetProposalsResponse>, AppError> {
    // Ensure the pursuit exists; an empty proposal list is a valid state
    kickoff_db::repositories::pursuit::get_pursuit_by_id(&state.db_pool, pursuit_id)
        .await
        .map_err(KickoffError::Database)?
        .ok_or_else(|| {
            KickoffError::NotFound(format!("Pursuit with ID {} not found", pursuit_id))
        })?;

    let proposals =
        kickoff_db::repositories::proposal::get_proposals_by_pursuit_id(&state.db_pool, pursuit_id)
            .await
            .map_err(KickoffError::Database)?;

    let response = GetProposalsResponse {
        pursuit_id,
        proposals: proposals
            .into_iter()
            .map(|p| ProposalResponse {
                user_id: p.user_id,
                slots: p.proposed_slots,
                created_at: p.created_at,
            })
            .collect(),
    };

    Ok(Json(response))
}
