use chrono::{DateTime, Utc};
use sqlx::{prelude::FromRow, types::Json, PgPool};
use uuid::Uuid;

use crate::models::{ContactInfo, Customization, Event, EventChanges, GiftInfo, ScheduleItem, Venue};

use super::{unique_as, StoreError};

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    date: DateTime<Utc>,
    venue: Json<Venue>,
    description: String,
    creator: Uuid,
    invitation_code: String,
    guests: Vec<Uuid>,
    contact_info: Json<ContactInfo>,
    schedule: Json<Vec<ScheduleItem>>,
    gift_info: Json<GiftInfo>,
    customization: Json<Customization>,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            date: row.date,
            venue: row.venue.0,
            description: row.description,
            creator: row.creator,
            invitation_code: row.invitation_code,
            guests: row.guests,
            contact_info: row.contact_info.0,
            schedule: row.schedule.0,
            gift_info: row.gift_info.0,
            customization: row.customization.0,
            created_at: row.created_at,
        }
    }
}

pub async fn create(event: &Event, pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO events (id, title, date, venue, description, creator, invitation_code,
            guests, contact_info, schedule, gift_info, customization, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(event.date)
    .bind(Json(&event.venue))
    .bind(&event.description)
    .bind(event.creator)
    .bind(&event.invitation_code)
    .bind(&event.guests)
    .bind(Json(&event.contact_info))
    .bind(Json(&event.schedule))
    .bind(Json(&event.gift_info))
    .bind(Json(&event.customization))
    .bind(event.created_at)
    .execute(pool)
    .await
    .map_err(unique_as("Event"))?;
    Ok(())
}

// /events/{id}
pub async fn get_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Event>, sqlx::Error> {
    let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Event::from))
}

pub async fn get_page(offset: i64, limit: i64, pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EventRow>(
        "SELECT * FROM events ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Event::from).collect())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await
}

// /users/{id}/events
pub async fn get_by_creator(creator: Uuid, limit: i64, pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EventRow>(
        "SELECT * FROM events WHERE creator = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
    )
    .bind(creator)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Event::from).collect())
}

/// Single-statement partial update; absent fields keep their stored value.
pub async fn set_fields(id: Uuid, changes: EventChanges, pool: &PgPool) -> Result<Option<Event>, sqlx::Error> {
    let row = sqlx::query_as::<_, EventRow>(
        "UPDATE events SET
            title = COALESCE($2, title),
            date = COALESCE($3, date),
            venue = COALESCE($4, venue),
            description = COALESCE($5, description),
            contact_info = COALESCE($6, contact_info),
            schedule = COALESCE($7, schedule),
            gift_info = COALESCE($8, gift_info)
        WHERE id = $1
        RETURNING *",
    )
    .bind(id)
    .bind(changes.title)
    .bind(changes.date)
    .bind(changes.venue.map(Json))
    .bind(changes.description)
    .bind(changes.contact_info.map(Json))
    .bind(changes.schedule.map(Json))
    .bind(changes.gift_info.map(Json))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Event::from))
}

pub async fn set_customization(
    id: Uuid,
    customization: Customization,
    pool: &PgPool,
) -> Result<Option<Event>, sqlx::Error> {
    let row = sqlx::query_as::<_, EventRow>(
        "UPDATE events SET customization = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(Json(customization))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Event::from))
}
