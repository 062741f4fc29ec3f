use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        Comment, ContactInfo, Customization, Event, EventChanges, GiftInfo, ProfileChanges,
        ScheduleItem, Status, User, Venue,
    },
};

#[derive(Debug, Deserialize, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewEventDto {
    pub title: String,
    pub date: DateTime<Utc>,
    pub venue: Venue,
    pub description: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub schedule: Vec<ScheduleItem>,
    #[serde(default)]
    pub gift_info: GiftInfo,
    #[serde(default)]
    pub customization: Option<Customization>,
}

/// Body keys an event update may carry but must never apply.
pub const PROTECTED_EVENT_FIELDS: [&str; 4] = ["id", "_id", "creator", "invitationCode"];

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub venue: Option<Venue>,
    pub description: Option<String>,
    pub contact_info: Option<ContactInfo>,
    pub schedule: Option<Vec<ScheduleItem>>,
    pub gift_info: Option<GiftInfo>,
}

impl UpdateEventDto {
    /// Parses a raw update body, dropping every protected key first.
    pub fn from_body(mut body: Value) -> Result<Self, AppError> {
        let obj = body
            .as_object_mut()
            .ok_or_else(|| AppError::validation("update body must be a JSON object"))?;
        for key in PROTECTED_EVENT_FIELDS {
            if obj.remove(key).is_some() {
                warn!("ignoring protected event field '{}' in update body", key);
            }
        }
        serde_json::from_value(body).map_err(|e| AppError::validation(e.to_string()))
    }

    pub fn into_changes(self) -> EventChanges {
        EventChanges {
            title: self.title.map(|t| t.trim().to_string()),
            date: self.date,
            venue: self.venue,
            description: self.description,
            contact_info: self.contact_info,
            schedule: self.schedule,
            gift_info: self.gift_info,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewStatusDto {
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewCommentDto {
    pub content: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
}

impl UpdateProfileDto {
    pub fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            name: self.name,
            bio: self.bio,
            profile_photo: self.profile_photo,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    /// 1-based page number; absent means the first page.
    pub fn page(&self) -> Result<u64, AppError> {
        match self.page {
            None => Ok(1),
            Some(p) if p >= 1 => Ok(p as u64),
            Some(p) => Err(AppError::validation(format!("page must be >= 1, got {p}"))),
        }
    }
}

/// User fields safe to hand to any caller.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_photo: String,
    pub bio: String,
    pub created_events: Vec<Uuid>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_photo: user.profile_photo,
            bio: user.bio,
            created_events: user.created_events,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<PublicUser>,
}

/// Public author fields resolved onto statuses and comments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuthorView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
}

impl From<&User> for AuthorView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.profile_photo.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub author: Option<AuthorView>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub id: Uuid,
    pub content: String,
    pub author: Option<AuthorView>,
    pub created_at: DateTime<Utc>,
    pub images: Vec<String>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentView>,
}

impl StatusView {
    /// Builds the view, resolving author ids through `lookup`.
    pub fn resolve<F>(status: Status, lookup: F) -> Self
    where
        F: Fn(Uuid) -> Option<AuthorView>,
    {
        let comments = status
            .comments
            .into_iter()
            .map(|Comment { id, content, author, created_at }| CommentView {
                id,
                content,
                author: lookup(author),
                created_at,
            })
            .collect();
        Self {
            id: status.id,
            content: status.content,
            author: lookup(status.author),
            created_at: status.created_at,
            images: status.images,
            likes: status.likes,
            comments,
        }
    }
}

/// Event as shown to readers: the invitation code is not part of it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub venue: Venue,
    pub description: String,
    pub creator: Uuid,
    pub guests: Vec<Uuid>,
    pub contact_info: ContactInfo,
    pub schedule: Vec<ScheduleItem>,
    pub gift_info: GiftInfo,
    pub customization: Customization,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            date: event.date,
            venue: event.venue,
            description: event.description,
            creator: event.creator,
            guests: event.guests,
            contact_info: event.contact_info,
            schedule: event.schedule,
            gift_info: event.gift_info,
            customization: event.customization,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPage {
    pub statuses: Vec<StatusView>,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub events: Vec<EventView>,
    pub has_more: bool,
}
