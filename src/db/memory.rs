//! In-process store for development runs and tests. Each operation holds
//! the lock for its whole read-modify-write, so single-document mutations
//! are atomic just like their SQL counterparts.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Comment, Customization, Event, EventChanges, ProfileChanges, Status, User};

use super::{Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    events: Vec<Event>,
    statuses: Vec<Status>,
}

/// Newest first; among equal timestamps the later insert wins.
fn newest_first<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<&T> {
    let mut indexed: Vec<(usize, &T)> = items.iter().enumerate().collect();
    indexed.sort_by_key(|(i, item)| Reverse((key(*item), *i)));
    indexed.into_iter().map(|(_, item)| item).collect()
}

fn page<T: Clone>(sorted: Vec<&T>, offset: u64, limit: u64) -> Vec<T> {
    sorted
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email || u.id == user.id) {
            return Err(StoreError::Duplicate("User"));
        }
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn list_users(&self, limit: u64) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        let mut users = inner.users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(users)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.iter_mut().find(|u| u.id == id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }

    async fn insert_event(&self, event: Event) -> Result<Event, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .events
            .iter()
            .any(|e| e.id == event.id || e.invitation_code == event.invitation_code)
        {
            return Err(StoreError::Duplicate("Event"));
        }
        inner.events.push(event.clone());
        if let Some(creator) = inner.users.iter_mut().find(|u| u.id == event.creator) {
            creator.created_events.push(event.id);
        }
        Ok(event)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_events(&self, offset: u64, limit: u64) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().await;
        Ok(page(newest_first(&inner.events, |e| e.created_at), offset, limit))
    }

    async fn count_events(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.events.len() as u64)
    }

    async fn events_by_creator(&self, creator: Uuid, limit: u64) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().await;
        let owned = newest_first(&inner.events, |e| e.created_at)
            .into_iter()
            .filter(|e| e.creator == creator)
            .collect();
        Ok(page(owned, 0, limit))
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Option<Event>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.events.iter_mut().find(|e| e.id == id).map(|event| {
            changes.apply(event);
            event.clone()
        }))
    }

    async fn set_customization(&self, id: Uuid, customization: Customization) -> Result<Option<Event>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.events.iter_mut().find(|e| e.id == id).map(|event| {
            event.customization = customization;
            event.clone()
        }))
    }

    async fn insert_status(&self, status: Status) -> Result<Status, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.statuses.iter().any(|s| s.id == status.id) {
            return Err(StoreError::Duplicate("Status"));
        }
        inner.statuses.push(status.clone());
        Ok(status)
    }

    async fn find_status(&self, id: Uuid) -> Result<Option<Status>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.statuses.iter().find(|s| s.id == id).cloned())
    }

    async fn list_statuses(&self, offset: u64, limit: u64) -> Result<Vec<Status>, StoreError> {
        let inner = self.inner.read().await;
        Ok(page(newest_first(&inner.statuses, |s| s.created_at), offset, limit))
    }

    async fn count_statuses(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.statuses.len() as u64)
    }

    async fn toggle_like(&self, id: Uuid, user: Uuid) -> Result<Option<Status>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.statuses.iter_mut().find(|s| s.id == id).map(|status| {
            match status.likes.iter().position(|liker| *liker == user) {
                Some(idx) => {
                    status.likes.remove(idx);
                }
                None => status.likes.push(user),
            }
            status.clone()
        }))
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Status>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.statuses.iter_mut().find(|s| s.id == id).map(|status| {
            status.comments.push(comment);
            status.clone()
        }))
    }
}
