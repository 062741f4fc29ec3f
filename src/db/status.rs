use chrono::{DateTime, Utc};
use sqlx::{prelude::FromRow, types::Json, PgPool};
use uuid::Uuid;

use crate::models::{Comment, Status};

#[derive(Debug, FromRow)]
struct StatusRow {
    id: Uuid,
    content: String,
    author: Uuid,
    created_at: DateTime<Utc>,
    images: Vec<String>,
    likes: Vec<Uuid>,
    comments: Json<Vec<Comment>>,
}

impl From<StatusRow> for Status {
    fn from(row: StatusRow) -> Self {
        Status {
            id: row.id,
            content: row.content,
            author: row.author,
            created_at: row.created_at,
            images: row.images,
            likes: row.likes,
            comments: row.comments.0,
        }
    }
}

pub async fn create(status: &Status, pool: &PgPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO statuses (id, content, author, created_at, images, likes, comments)
        VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(status.id)
    .bind(&status.content)
    .bind(status.author)
    .bind(status.created_at)
    .bind(&status.images)
    .bind(&status.likes)
    .bind(Json(&status.comments))
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn get_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Status>, sqlx::Error> {
    let row = sqlx::query_as::<_, StatusRow>("SELECT * FROM statuses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Status::from))
}

pub async fn get_page(offset: i64, limit: i64, pool: &PgPool) -> Result<Vec<Status>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StatusRow>(
        "SELECT * FROM statuses ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Status::from).collect())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM statuses")
        .fetch_one(pool)
        .await
}

pub async fn toggle_like(id: Uuid, user_id: Uuid, pool: &PgPool) -> Result<Option<Status>, sqlx::Error> {
    let row = sqlx::query_as::<_, StatusRow>(
        "UPDATE statuses SET likes = CASE
            WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
            ELSE array_append(likes, $2)
        END
        WHERE id = $1
        RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Status::from))
}

pub async fn push_comment(id: Uuid, comment: Comment, pool: &PgPool) -> Result<Option<Status>, sqlx::Error> {
    let row = sqlx::query_as::<_, StatusRow>(
        "UPDATE statuses SET comments = comments || $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(Json(vec![comment]))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Status::from))
}
