use axum::Json;
use chrono::Utc;
use kickoff_api::middleware::error_handling::AppError;
use kickoff_core::{
    errors::KickoffError,
    models::{
        kickoff::KickoffDetails,
        proposal::LocationType,
        pursuit::{CreatePursuitRequest, CreatePursuitResponse, GetPursuitResponse},
    },
};
use kickoff_db::models::{DbKickoff, DbPursuit, DbPursuitMember};
use mockall::predicate;
use uuid::Uuid;

use crate::test_utils::TestContext;

// Wrapper mirroring the create handler against mock repositories
async fn test_create_pursuit_wrapper(
    ctx: &mut TestContext,
    request: CreatePursuitRequest,
) -> Result<Json<CreatePursuitResponse>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError(KickoffError::Validation(
            "Pursuit name must not be empty".into(),
        )));
    }

    // Use static references for mockall
    let name_static: &'static str = Box::leak(request.name.clone().into_boxed_str());
    let password_hash = request
        .password
        .as_ref()
        .map(|p| kickoff_api::middleware::auth::hash_password(p))
        .transpose()?;
    let hash_static: Option<&'static str> =
        password_hash.map(|h| &*Box::leak(h.into_boxed_str()) as &'static str);

    let pursuit = ctx
        .pursuit_repo
        .create_pursuit(name_static, hash_static)
        .await?;

    for user_id in &request.member_ids {
        ctx.pursuit_repo.add_member(pursuit.id, *user_id).await?;
    }

    Ok(Json(CreatePursuitResponse {
        id: pursuit.id,
        name: pursuit.name,
        created_at: pursuit.created_at,
        is_protected: pursuit.password_hash.is_some(),
    }))
}

// Wrapper mirroring the get handler against mock repositories
async fn test_get_pursuit_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
) -> Result<Json<GetPursuitResponse>, AppError> {
    let pursuit = match ctx.pursuit_repo.get_pursuit_by_id(id).await? {
        Some(pursuit) => pursuit,
        None => {
            return Err(AppError(KickoffError::NotFound(format!(
                "Pursuit with ID {} not found",
                id
            ))));
        }
    };

    let members = ctx.pursuit_repo.get_members(id).await?;
    let kickoff = ctx.kickoff_repo.get_kickoff_by_pursuit_id(id).await?;

    let kickoff = match kickoff {
        Some(k) => {
            let location_type = k
                .location_type
                .parse::<LocationType>()
                .map_err(|e| AppError(KickoffError::Internal(e.into())))?;
            Some(KickoffDetails {
                datetime: k.slot_time,
                location_type,
                scheduled_at: k.scheduled_at,
            })
        }
        None => None,
    };

    Ok(Json(GetPursuitResponse {
        id: pursuit.id,
        name: pursuit.name,
        created_at: pursuit.created_at,
        is_protected: pursuit.password_hash.is_some(),
        members: members.into_iter().map(|m| m.user_id).collect(),
        kickoff,
    }))
}

#[tokio::test]
async fn test_create_pursuit_rejects_empty_name() {
    let mut ctx = TestContext::new();

    let request = CreatePursuitRequest {
        name: "   ".to_string(),
        password: None,
        member_ids: vec![],
    };
    let result = test_create_pursuit_wrapper(&mut ctx, request).await;

    assert!(matches!(
        result,
        Err(AppError(KickoffError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_create_pursuit_registers_members() {
    let mut ctx = TestContext::new();
    let member_a = Uuid::new_v4();
    let member_b = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_create_pursuit()
        .returning(|name, password_hash| {
            Ok(DbPursuit {
                id: Uuid::new_v4(),
                name: name.to_string(),
                password_hash: password_hash.map(String::from),
                created_at: Utc::now(),
            })
        });

    ctx.pursuit_repo
        .expect_add_member()
        .times(2)
        .returning(|pursuit_id, user_id| {
            Ok(DbPursuitMember {
                pursuit_id,
                user_id,
                created_at: Utc::now(),
            })
        });

    let request = CreatePursuitRequest {
        name: "Rocket Team".to_string(),
        password: None,
        member_ids: vec![member_a, member_b],
    };
    let Json(response) = test_create_pursuit_wrapper(&mut ctx, request)
        .await
        .expect("creation should succeed");

    assert_eq!(response.name, "Rocket Team");
    assert!(!response.is_protected);
}

#[tokio::test]
async fn test_create_pursuit_with_password_is_protected() {
    let mut ctx = TestContext::new();

    ctx.pursuit_repo
        .expect_create_pursuit()
        .withf(|_, password_hash| {
            // The handler stores an argon2 hash, never the raw password
            matches!(password_hash, Some(h) if h.starts_with("$argon2"))
        })
        .returning(|name, password_hash| {
            Ok(DbPursuit {
                id: Uuid::new_v4(),
                name: name.to_string(),
                password_hash: password_hash.map(String::from),
                created_at: Utc::now(),
            })
        });

    let request = CreatePursuitRequest {
        name: "Rocket Team".to_string(),
        password: Some("launch-code".to_string()),
        member_ids: vec![],
    };
    let Json(response) = test_create_pursuit_wrapper(&mut ctx, request)
        .await
        .expect("creation should succeed");

    assert!(response.is_protected);
}

#[tokio::test]
async fn test_get_pursuit_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let result = test_get_pursuit_wrapper(&mut ctx, id).await;

    assert!(matches!(
        result,
        Err(AppError(KickoffError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_get_pursuit_includes_members_and_kickoff() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| {
            Ok(Some(DbPursuit {
                id,
                name: "Rocket Team".to_string(),
                password_hash: None,
                created_at: Utc::now(),
            }))
        });

    ctx.pursuit_repo.expect_get_members().returning(move |id| {
        Ok(vec![DbPursuitMember {
            pursuit_id: id,
            user_id,
            created_at: Utc::now(),
        }])
    });

    ctx.kickoff_repo
        .expect_get_kickoff_by_pursuit_id()
        .returning(|pursuit_id| {
            Ok(Some(DbKickoff {
                pursuit_id,
                slot_time: "2025-03-01T18:00:00Z".parse().unwrap(),
                location_type: "video".to_string(),
                scheduled_at: Utc::now(),
            }))
        });

    let Json(response) = test_get_pursuit_wrapper(&mut ctx, id)
        .await
        .expect("lookup should succeed");

    assert_eq!(response.members, vec![user_id]);
    let kickoff = response.kickoff.expect("kickoff should be present");
    assert_eq!(kickoff.location_type, LocationType::Video);
}
