use std::collections::{HashMap, HashSet};

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::{
    db::Store,
    dto::{AuthorView, NewCommentDto, NewStatusDto, StatusPage, StatusView},
    errors::AppError,
    models::{Comment, Status},
    validation, STATUS_PAGE_SIZE,
};

use super::jwt::Identity;

/// Slice of a newest-first listing addressed by a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// True when items exist past this window.
    pub fn has_more(&self, total: u64) -> bool {
        total > self.offset.saturating_add(self.limit)
    }
}

pub fn page_window(page: u64, page_size: u64) -> PageWindow {
    PageWindow {
        offset: page.saturating_sub(1).saturating_mul(page_size),
        limit: page_size,
    }
}

/// Resolves status and comment authors with one user lookup.
pub async fn resolve(statuses: Vec<Status>, store: &dyn Store) -> Result<Vec<StatusView>, AppError> {
    let ids: HashSet<Uuid> = statuses
        .iter()
        .flat_map(|s| std::iter::once(s.author).chain(s.comments.iter().map(|c| c.author)))
        .collect();
    let ids: Vec<Uuid> = ids.into_iter().collect();
    let authors: HashMap<Uuid, AuthorView> = store
        .find_users(&ids)
        .await?
        .iter()
        .map(|u| (u.id, AuthorView::from(u)))
        .collect();
    Ok(statuses
        .into_iter()
        .map(|s| StatusView::resolve(s, |id| authors.get(&id).cloned()))
        .collect())
}

async fn resolve_one(status: Status, store: &dyn Store) -> Result<StatusView, AppError> {
    resolve(vec![status], store)
        .await?
        .pop()
        .ok_or(AppError::Internal)
}

pub async fn get_page(page: u64, store: &dyn Store) -> Result<StatusPage, AppError> {
    let window = page_window(page, STATUS_PAGE_SIZE);
    let statuses = store.list_statuses(window.offset, window.limit).await?;
    let total = store.count_statuses().await?;
    Ok(StatusPage {
        statuses: resolve(statuses, store).await?,
        has_more: window.has_more(total),
    })
}

/// The author is the session identity, never a value from the body.
pub async fn create(identity: &Identity, dto: NewStatusDto, store: &dyn Store) -> Result<StatusView, AppError> {
    validation::new_status(&dto)?;
    let status = Status {
        id: Uuid::new_v4(),
        content: dto.content,
        author: identity.id,
        created_at: Utc::now(),
        images: dto.images,
        likes: Vec::new(),
        comments: Vec::new(),
    };
    let status = store.insert_status(status).await?;
    info!("status {} posted by {}", status.id, identity.id);
    resolve_one(status, store).await
}

/// Likes when the session user has not liked yet, unlikes otherwise.
pub async fn toggle_like(id: Uuid, identity: &Identity, store: &dyn Store) -> Result<StatusView, AppError> {
    let status = store
        .toggle_like(id, identity.id)
        .await?
        .ok_or(AppError::NotFound("Status not found"))?;
    resolve_one(status, store).await
}

pub async fn add_comment(
    id: Uuid,
    identity: &Identity,
    dto: NewCommentDto,
    store: &dyn Store,
) -> Result<StatusView, AppError> {
    validation::new_comment(&dto)?;
    let comment = Comment {
        id: Uuid::new_v4(),
        content: dto.content,
        author: identity.id,
        created_at: Utc::now(),
    };
    let status = store
        .push_comment(id, comment)
        .await?
        .ok_or(AppError::NotFound("Status not found"))?;
    resolve_one(status, store).await
}
