use uuid::Uuid;
use sqlx::PgPool;

use crate::models::{ProfileChanges, User};

use super::{unique_as, StoreError};

pub async fn create(user: &User, pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, profile_photo, bio, created_events)
        VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.profile_photo)
    .bind(&user.bio)
    .bind(&user.created_events)
    .execute(pool)
    .await
    .map_err(unique_as("User"))?;
    Ok(())
}

pub async fn get_by_id(id: Uuid, pool: &PgPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, profile_photo, bio, created_events
        FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_by_email(email: &str, pool: &PgPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, profile_photo, bio, created_events
        FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn get_many(ids: &[Uuid], pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, profile_photo, bio, created_events
        FROM users WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub async fn get_all(limit: i64, pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, profile_photo, bio, created_events
        FROM users ORDER BY name LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn set_fields(id: Uuid, changes: ProfileChanges, pool: &PgPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET
            name = COALESCE($2, name),
            bio = COALESCE($3, bio),
            profile_photo = COALESCE($4, profile_photo)
        WHERE id = $1
        RETURNING id, name, email, password_hash, profile_photo, bio, created_events",
    )
    .bind(id)
    .bind(changes.name)
    .bind(changes.bio)
    .bind(changes.profile_photo)
    .fetch_optional(pool)
    .await
}

pub async fn push_created_event(id: Uuid, event_id: Uuid, pool: &PgPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE users SET created_events = array_append(created_events, $2) WHERE id = $1")
        .bind(id)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
