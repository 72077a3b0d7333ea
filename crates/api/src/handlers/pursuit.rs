use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use kickoff_core::{
    errors::KickoffError,
    models::{
        kickoff::KickoffDetails,
        proposal::LocationType,
        pursuit::{
            CreatePursuitRequest, CreatePursuitResponse, GetPursuitResponse,
            VerifyPasswordRequest, VerifyPasswordResponse,
        },
    },
};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn create_pursuit(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreatePursuitRequest>,
) -> Result<Json<CreatePursuitResponse>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(KickoffError::Validation(
            "Pursuit name must not be empty".to_string(),
        )));
    }

    // Hash password if provided
    let password_hash = match &payload.password {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    // Create pursuit in database
    let db_pursuit = kickoff_db::repositories::pursuit::create_pursuit(
        &state.db_pool,
        &payload.name,
        password_hash.as_deref(),
    )
    .await
    .map_err(KickoffError::Database)?;

    // Register initial members if provided
    for user_id in &payload.member_ids {
        kickoff_db::repositories::pursuit::add_member(&state.db_pool, db_pursuit.id, *user_id)
            .await
            .map_err(KickoffError::Database)?;
    }

    let response = CreatePursuitResponse {
        id: db_pursuit.id,
        name: db_pursuit.name,
        created_at: db_pursuit.created_at,
        is_protected: db_pursuit.password_hash.is_some(),
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_pursuit(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetPursuitResponse>, AppError> {
    // Get pursuit from database
    let db_pursuit = kickoff_db::repositories::pursuit::get_pursuit_by_id(&state.db_pool, id)
        .await
        .map_err(KickoffError::Database)?
        .ok_or_else(|| KickoffError::NotFound(format!("Pursuit with ID {} not found", id)))?;

    // Get members for pursuit
    let members = kickoff_db::repositories::pursuit::get_members(&state.db_pool, id)
        .await
        .map_err(KickoffError::Database)?;

    // Include the decided kickoff, if one exists
    let kickoff = kickoff_db::repositories::kickoff::get_kickoff_by_pursuit_id(&state.db_pool, id)
        .await
        .map_err(KickoffError::Database)?;

    let kickoff = match kickoff {
        Some(k) => {
            let location_type = k
                .location_type
                .parse::<LocationType>()
                .map_err(|e| KickoffError::Internal(e.into()))?;
            Some(KickoffDetails {
                datetime: k.slot_time,
                location_type,
                scheduled_at: k.scheduled_at,
            })
        }
        None => None,
    };

    let response = GetPursuitResponse {
        id: db_pursuit.id,
        name: db_pursuit.name,
        created_at: db_pursuit.created_at,
        is_protected: db_pursuit.password_hash.is_some(),
        members: members.into_iter().map(|m| m.user_id).collect(),
        kickoff,
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn verify_password(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifyPasswordRequest>,
) -> Result<Json<VerifyPasswordResponse>, AppError> {
    // Ensure the pursuit exists before verifying
    kickoff_db::repositories::pursuit::get_pursuit_by_id(&state.db_pool, id)
        .await
        .map_err(KickoffError::Database)?
        .ok_or_else(|| KickoffError::NotFound(format!("Pursuit with ID {} not found", id)))?;

    let valid = auth::verify_pursuit_password(&state.db_pool, id, &payload.password)
        .await
        .map_err(KickoffError::Database)?;

    Ok(Json(VerifyPasswordResponse { valid }))
}
