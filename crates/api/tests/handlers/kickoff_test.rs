use axum::Json;
use chrono::{DateTime, Utc};
use kickoff_api::middleware::error_handling::AppError;
use kickoff_core::{
    errors::KickoffError,
    models::{
        kickoff::{RankingResponse, ScheduleKickoffRequest, ScheduleKickoffResponse, SlotChoice},
        notification::NotificationKind,
        proposal::{LocationType, ProposedSlot, TimeSlotProposal},
    },
    scheduling,
};
use kickoff_db::models::{DbKickoff, DbPursuit, DbPursuitMember};
use mockall::predicate;
use uuid::Uuid;

use crate::test_utils::TestContext;

fn db_pursuit(id: Uuid, protected: bool) -> DbPursuit {
    DbPursuit {
        id,
        name: "Rocket Team".to_string(),
        password_hash: protected.then(|| "$argon2id$fake".to_string()),
        created_at: Utc::now(),
    }
}

fn member(pursuit_id: Uuid, user_id: Uuid) -> DbPursuitMember {
    DbPursuitMember {
        pursuit_id,
        user_id,
        created_at: Utc::now(),
    }
}

fn proposal(pursuit_id: Uuid, slots: Vec<(&str, LocationType)>) -> TimeSlotProposal {
    TimeSlotProposal {
        pursuit_id,
        user_id: Uuid::new_v4(),
        proposed_slots: slots
            .into_iter()
            .map(|(s, location_type)| {
                ProposedSlot::new(s.parse::<DateTime<Utc>>().unwrap(), location_type)
            })
            .collect(),
        created_at: Utc::now(),
    }
}

// Wrapper mirroring the ranking handler against mock repositories
async fn test_get_ranking_wrapper(
    ctx: &mut TestContext,
    pursuit_id: Uuid,
    count: Option<usize>,
) -> Result<Json<RankingResponse>, AppError> {
    let count = count.unwrap_or(5);

    match ctx.pursuit_repo.get_pursuit_by_id(pursuit_id).await? {
        Some(_) => {
            let proposals = ctx
                .proposal_repo
                .get_proposals_by_pursuit_id(pursuit_id)
                .await?;

            let mut slots = scheduling::rank_slots(&proposals);
            slots.truncate(count);

            Ok(Json(RankingResponse { pursuit_id, slots }))
        }
        None => Err(AppError(KickoffError::NotFound(format!(
            "Pursuit with ID {} not found",
            pursuit_id
        )))),
    }
}

// Wrapper mirroring the schedule handler against mock repositories
async fn test_schedule_kickoff_wrapper(
    ctx: &mut TestContext,
    pursuit_id: Uuid,
    request: ScheduleKickoffRequest,
) -> Result<Json<ScheduleKickoffResponse>, AppError> {
    let pursuit = match ctx.pursuit_repo.get_pursuit_by_id(pursuit_id).await? {
        Some(pursuit) => pursuit,
        None => {
            return Err(AppError(KickoffError::NotFound(format!(
                "Pursuit with ID {} not found",
                pursuit_id
            ))));
        }
    };

    if let Some(password) = &request.password {
        // Use static reference for mock
        let password_static: &'static str = Box::leak(password.clone().into_boxed_str());

        let is_valid = ctx
            .pursuit_repo
            .verify_password(pursuit_id, password_static)
            .await?;
        if !is_valid {
            return Err(AppError(KickoffError::Authentication(
                "Invalid password".into(),
            )));
        }
    } else if pursuit.password_hash.is_some() {
        return Err(AppError(KickoffError::Authentication(
            "Password required to schedule this kickoff".into(),
        )));
    }

    let chosen = match &request.slot {
        Some(choice) => ProposedSlot::new(choice.datetime, choice.location_type),
        None => {
            let proposals = ctx
                .proposal_repo
                .get_proposals_by_pursuit_id(pursuit_id)
                .await?;
            let top = scheduling::top_slot(&proposals).ok_or_else(|| {
                AppError(KickoffError::Validation(
                    "No proposals submitted; cannot pick a kickoff slot".into(),
                ))
            })?;
            ProposedSlot::new(top.datetime, top.location_type)
        }
    };

    let kickoff = ctx
        .kickoff_repo
        .schedule_kickoff(pursuit_id, chosen.datetime, chosen.location_type)
        .await?;

    let members = ctx.pursuit_repo.get_members(pursuit_id).await?;
    let recipients: Vec<Uuid> = members.into_iter().map(|m| m.user_id).collect();
    ctx.notification_repo
        .insert_notifications(
            recipients,
            pursuit_id,
            NotificationKind::KickoffScheduled,
            "Kickoff scheduled",
        )
        .await?;

    Ok(Json(ScheduleKickoffResponse {
        pursuit_id,
        datetime: kickoff.slot_time,
        location_type: chosen.location_type,
        scheduled_at: kickoff.scheduled_at,
    }))
}

#[tokio::test]
async fn test_get_ranking_pursuit_not_found() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .with(predicate::eq(pursuit_id))
        .returning(|_| Ok(None));

    let result = test_get_ranking_wrapper(&mut ctx, pursuit_id, None).await;

    assert!(matches!(
        result,
        Err(AppError(KickoffError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_get_ranking_orders_by_popularity() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .with(predicate::eq(pursuit_id))
        .returning(move |id| Ok(Some(db_pursuit(id, false))));

    ctx.proposal_repo
        .expect_get_proposals_by_pursuit_id()
        .with(predicate::eq(pursuit_id))
        .returning(move |id| {
            Ok(vec![
                proposal(
                    id,
                    vec![
                        ("2025-03-01T18:00:00Z", LocationType::Video),
                        ("2025-03-02T18:00:00Z", LocationType::InPerson),
                    ],
                ),
                proposal(id, vec![("2025-03-01T18:00:00Z", LocationType::Video)]),
                proposal(
                    id,
                    vec![
                        ("2025-03-01T18:00:00Z", LocationType::Video),
                        ("2025-03-02T18:00:00Z", LocationType::InPerson),
                    ],
                ),
            ])
        });

    let Json(response) = test_get_ranking_wrapper(&mut ctx, pursuit_id, None)
        .await
        .expect("ranking should succeed");

    assert_eq!(response.slots.len(), 2);
    assert_eq!(response.slots[0].count, 3);
    assert_eq!(response.slots[0].location_type, LocationType::Video);
    assert_eq!(response.slots[1].count, 2);
    assert_eq!(response.slots[1].location_type, LocationType::InPerson);
}

#[tokio::test]
async fn test_get_ranking_truncates_to_count() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| Ok(Some(db_pursuit(id, false))));

    ctx.proposal_repo
        .expect_get_proposals_by_pursuit_id()
        .returning(move |id| {
            Ok(vec![proposal(
                id,
                vec![
                    ("2025-03-01T10:00:00Z", LocationType::Video),
                    ("2025-03-02T10:00:00Z", LocationType::Video),
                    ("2025-03-03T10:00:00Z", LocationType::Video),
                ],
            )])
        });

    let Json(response) = test_get_ranking_wrapper(&mut ctx, pursuit_id, Some(2))
        .await
        .expect("ranking should succeed");

    assert_eq!(response.slots.len(), 2);
}

#[tokio::test]
async fn test_get_ranking_empty_proposals_is_empty_state() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| Ok(Some(db_pursuit(id, false))));

    ctx.proposal_repo
        .expect_get_proposals_by_pursuit_id()
        .returning(|_| Ok(vec![]));

    let Json(response) = test_get_ranking_wrapper(&mut ctx, pursuit_id, None)
        .await
        .expect("empty ranking is not an error");

    assert!(response.slots.is_empty());
}

#[tokio::test]
async fn test_schedule_kickoff_requires_password_when_protected() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| Ok(Some(db_pursuit(id, true))));

    let request = ScheduleKickoffRequest {
        slot: None,
        password: None,
    };
    let result = test_schedule_kickoff_wrapper(&mut ctx, pursuit_id, request).await;

    assert!(matches!(
        result,
        Err(AppError(KickoffError::Authentication(_)))
    ));
}

#[tokio::test]
async fn test_schedule_kickoff_rejects_invalid_password() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| Ok(Some(db_pursuit(id, true))));
    ctx.pursuit_repo
        .expect_verify_password()
        .returning(|_, _| Ok(false));

    let request = ScheduleKickoffRequest {
        slot: None,
        password: Some("wrong".to_string()),
    };
    let result = test_schedule_kickoff_wrapper(&mut ctx, pursuit_id, request).await;

    assert!(matches!(
        result,
        Err(AppError(KickoffError::Authentication(_)))
    ));
}

#[tokio::test]
async fn test_schedule_kickoff_picks_top_ranked_slot() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();
    let winner: DateTime<Utc> = "2025-03-01T18:00:00Z".parse().unwrap();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| Ok(Some(db_pursuit(id, false))));

    ctx.proposal_repo
        .expect_get_proposals_by_pursuit_id()
        .returning(move |id| {
            Ok(vec![
                proposal(id, vec![("2025-03-01T18:00:00Z", LocationType::Video)]),
                proposal(
                    id,
                    vec![
                        ("2025-03-01T18:00:00Z", LocationType::Video),
                        ("2025-03-02T18:00:00Z", LocationType::InPerson),
                    ],
                ),
            ])
        });

    ctx.kickoff_repo
        .expect_schedule_kickoff()
        .with(
            predicate::eq(pursuit_id),
            predicate::eq(winner),
            predicate::eq(LocationType::Video),
        )
        .returning(|pursuit_id, slot_time, location_type| {
            Ok(DbKickoff {
                pursuit_id,
                slot_time,
                location_type: location_type.as_str().to_string(),
                scheduled_at: Utc::now(),
            })
        });

    ctx.pursuit_repo
        .expect_get_members()
        .returning(move |id| Ok(vec![member(id, Uuid::new_v4()), member(id, Uuid::new_v4())]));

    ctx.notification_repo
        .expect_insert_notifications()
        .withf(|recipients, _, kind, _| {
            recipients.len() == 2 && *kind == NotificationKind::KickoffScheduled
        })
        .returning(|recipients, _, _, _| Ok(recipients.len()));

    let request = ScheduleKickoffRequest {
        slot: None,
        password: None,
    };
    let Json(response) = test_schedule_kickoff_wrapper(&mut ctx, pursuit_id, request)
        .await
        .expect("scheduling should succeed");

    assert_eq!(response.datetime, winner);
    assert_eq!(response.location_type, LocationType::Video);
}

#[tokio::test]
async fn test_schedule_kickoff_explicit_slot_wins() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();
    let explicit: DateTime<Utc> = "2025-04-01T09:00:00Z".parse().unwrap();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| Ok(Some(db_pursuit(id, false))));

    // The proposal snapshot must not be consulted for an explicit choice
    ctx.proposal_repo
        .expect_get_proposals_by_pursuit_id()
        .never();

    ctx.kickoff_repo
        .expect_schedule_kickoff()
        .with(
            predicate::eq(pursuit_id),
            predicate::eq(explicit),
            predicate::eq(LocationType::InPerson),
        )
        .returning(|pursuit_id, slot_time, location_type| {
            Ok(DbKickoff {
                pursuit_id,
                slot_time,
                location_type: location_type.as_str().to_string(),
                scheduled_at: Utc::now(),
            })
        });

    ctx.pursuit_repo
        .expect_get_members()
        .returning(move |id| Ok(vec![member(id, Uuid::new_v4())]));

    ctx.notification_repo
        .expect_insert_notifications()
        .returning(|recipients, _, _, _| Ok(recipients.len()));

    let request = ScheduleKickoffRequest {
        slot: Some(SlotChoice {
            datetime: explicit,
            location_type: LocationType::InPerson,
        }),
        password: None,
    };
    let Json(response) = test_schedule_kickoff_wrapper(&mut ctx, pursuit_id, request)
        .await
        .expect("scheduling should succeed");

    assert_eq!(response.datetime, explicit);
    assert_eq!(response.location_type, LocationType::InPerson);
}

#[tokio::test]
async fn test_schedule_kickoff_without_proposals_is_rejected() {
    let mut ctx = TestContext::new();
    let pursuit_id = Uuid::new_v4();

    ctx.pursuit_repo
        .expect_get_pursuit_by_id()
        .returning(move |id| Ok(Some(db_pursuit(id, false))));

    ctx.proposal_repo
        .expect_get_proposals_by_pursuit_id()
        .returning(|_| Ok(vec![]));

    let request = ScheduleKickoffRequest {
        slot: None,
        password: None,
    };
    let result = test_schedule_kickoff_wrapper(&mut ctx, pursuit_id, request).await;

    assert!(matches!(
        result,
        Err(AppError(KickoffError::Validation(_)))
    ));
}
