use crate::models::{DbPursuit, DbPursuitMember};
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_pursuit(
    pool: &Pool<Postgres>,
    name: &str,
    password_hash: Option<&str>,
) -> Result<DbPursuit> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating pursuit: id={}, name={}, has_password={}",
        id,
        name,
        password_hash.is_some()
    );

    let pursuit = sqlx::query_as::<_, DbPursuit>(
        r#"
        INSERT INTO pursuits (id, name, password_hash, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, password_hash, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Pursuit created successfully: id={}", id);
    Ok(pursuit)
}

pub async fn get_pursuit_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPursuit>> {
    tracing::debug!("Getting pursuit by id: {}", id);

    let pursuit = sqlx::query_as::<_, DbPursuit>(
        r#"
        SELECT id, name, password_hash, created_at
        FROM pursuits
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if let Some(p) = &pursuit {
        tracing::debug!("Pursuit found: id={}, name={}", p.id, p.name);
    } else {
        tracing::debug!("Pursuit not found: id={}", id);
    }

    Ok(pursuit)
}

pub async fn add_member(
    pool: &Pool<Postgres>,
    pursuit_id: Uuid,
    user_id: Uuid,
) -> Result<DbPursuitMember> {
    let now = Utc::now();

    let member = sqlx::query_as::<_, DbPursuitMember>(
        r#"
        INSERT INTO pursuit_members (pursuit_id, user_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (pursuit_id, user_id)
        DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING pursuit_id, user_id, created_at
        "#,
    )
    .bind(pursuit_id)
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(member)
}

pub async fn get_members(pool: &Pool<Postgres>, pursuit_id: Uuid) -> Result<Vec<DbPursuitMember>> {
    let members = sqlx::query_as::<_, DbPursuitMember>(
        r#"
        SELECT pursuit_id, user_id, created_at
        FROM pursuit_members
        WHERE pursuit_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(pursuit_id)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

pub async fn verify_password(pool: &Pool<Postgres>, id: Uuid, password: &str) -> Result<bool> {
    let pursuit = get_pursuit_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Pursuit not found"))?;

    match pursuit.password_hash {
        Some(hash) => {
            let parsed_hash = argon2::PasswordHash::new(&hash)
                .map_err(|e| eyre!("Invalid password hash: {}", e))?;
            let is_valid = Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok();
            Ok(is_valid)
        }
        None => Ok(true), // If no password is set, consider any password valid
    }
}
