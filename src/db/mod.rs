pub mod event;
pub mod memory;
pub mod status;
pub mod user;

use async_trait::async_trait;
use derive_more::Display;
use log::{error, info};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::models::{Comment, Customization, Event, EventChanges, ProfileChanges, Status, User};

#[derive(Debug, Display, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write; carries the document kind.
    #[display(fmt = "duplicate {}", _0)]
    Duplicate(&'static str),

    #[display(fmt = "storage backend error: {}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Backend(format!("migration failed: {err}"))
    }
}

/// Maps a unique-constraint violation to `Duplicate(kind)`.
pub(crate) fn unique_as(kind: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(kind);
            }
        }
        err.into()
    }
}

/// Persistence operations. Every mutation touches a single document and is
/// atomic at the storage layer.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;
    async fn list_users(&self, limit: u64) -> Result<Vec<User>, StoreError>;
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<User>, StoreError>;

    /// Inserts the event, then appends its id to the creator's created events.
    async fn insert_event(&self, event: Event) -> Result<Event, StoreError>;
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError>;
    /// Newest first.
    async fn list_events(&self, offset: u64, limit: u64) -> Result<Vec<Event>, StoreError>;
    async fn count_events(&self) -> Result<u64, StoreError>;
    /// Newest first, at most `limit` events.
    async fn events_by_creator(&self, creator: Uuid, limit: u64) -> Result<Vec<Event>, StoreError>;
    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>, StoreError>;
    async fn set_customization(&self, id: Uuid, customization: Customization) -> Result<Option<Event>, StoreError>;

    async fn insert_status(&self, status: Status) -> Result<Status, StoreError>;
    async fn find_status(&self, id: Uuid) -> Result<Option<Status>, StoreError>;
    /// Newest first.
    async fn list_statuses(&self, offset: u64, limit: u64) -> Result<Vec<Status>, StoreError>;
    async fn count_statuses(&self) -> Result<u64, StoreError>;
    /// Removes `user` from the like set if present, adds it otherwise.
    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<Status>, StoreError>;
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Status>, StoreError>;
}

/// Process-lifetime Postgres handle, connected on first use.
///
/// Concurrent first callers share one connection attempt. A failed attempt
/// leaves the handle empty so the next caller retries.
pub struct Database {
    url: String,
    max_connections: u32,
    pool: OnceCell<PgPool>,
}

impl Database {
    pub fn new(url: String, max_connections: u32) -> Self {
        Self {
            url,
            max_connections,
            pool: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    pub async fn pool(&self) -> Result<&PgPool, StoreError> {
        self.pool
            .get_or_try_init(|| init_db_pool(&self.url, self.max_connections))
            .await
    }
}

async fn init_db_pool(db_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    info!("connecting to postgresql");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await
        .map_err(|err| {
            error!("postgresql connection failed: {}", err);
            StoreError::from(err)
        })?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("connected with postgresql");
    Ok(pool)
}

pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let pool = self.db.pool().await?;
        user::create(&user, pool).await?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(user::get_by_id(id, self.db.pool().await?).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(user::get_by_email(email, self.db.pool().await?).await?)
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(user::get_many(ids, self.db.pool().await?).await?)
    }

    async fn list_users(&self, limit: u64) -> Result<Vec<User>, StoreError> {
        Ok(user::get_all(to_i64(limit), self.db.pool().await?).await?)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<User>, StoreError> {
        Ok(user::set_fields(id, changes, self.db.pool().await?).await?)
    }

    async fn insert_event(&self, new_event: Event) -> Result<Event, StoreError> {
        let pool = self.db.pool().await?;
        event::create(&new_event, pool).await?;
        user::push_created_event(new_event.creator, new_event.id, pool).await?;
        Ok(new_event)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(event::get_by_id(id, self.db.pool().await?).await?)
    }

    async fn list_events(&self, offset: u64, limit: u64) -> Result<Vec<Event>, StoreError> {
        Ok(event::get_page(to_i64(offset), to_i64(limit), self.db.pool().await?).await?)
    }

    async fn count_events(&self) -> Result<u64, StoreError> {
        let n = event::count(self.db.pool().await?).await?;
        Ok(n.max(0) as u64)
    }

    async fn events_by_creator(&self, creator: Uuid, limit: u64) -> Result<Vec<Event>, StoreError> {
        Ok(event::get_by_creator(creator, to_i64(limit), self.db.pool().await?).await?)
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>, StoreError> {
        Ok(event::set_fields(id, changes, self.db.pool().await?).await?)
    }

    async fn set_customization(&self, id: Uuid, customization: Customization) -> Result<Option<Event>, StoreError> {
        Ok(event::set_customization(id, customization, self.db.pool().await?).await?)
    }

    async fn insert_status(&self, new_status: Status) -> Result<Status, StoreError> {
        status::create(&new_status, self.db.pool().await?).await?;
        Ok(new_status)
    }

    async fn find_status(&self, id: Uuid) -> Result<Option<Status>, StoreError> {
        Ok(status::get_by_id(id, self.db.pool().await?).await?)
    }

    async fn list_statuses(&self, offset: u64, limit: u64) -> Result<Vec<Status>, StoreError> {
        Ok(status::get_page(to_i64(offset), to_i64(limit), self.db.pool().await?).await?)
    }

    async fn count_statuses(&self) -> Result<u64, StoreError> {
        let n = status::count(self.db.pool().await?).await?;
        Ok(n.max(0) as u64)
    }

    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<Status>, StoreError> {
        Ok(status::toggle_like(id, user, self.db.pool().await?).await?)
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Status>, StoreError> {
        Ok(status::push_comment(id, comment, self.db.pool().await?).await?)
    }
}
