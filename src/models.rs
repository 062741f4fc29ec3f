use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Never serialized, whatever response shape embeds a `User`.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub profile_photo: String,
    pub bio: String,
    pub created_events: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Venue {
    pub name: String,
    pub address: String,
    pub maps_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub bride_contact: String,
    pub groom_contact: String,
    pub rsvp_contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleItem {
    pub time: String,
    pub activity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftInfo {
    pub bank_account: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Classic,
    Modern,
    Rustic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub layout: Layout,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub hero_image: String,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            layout: Layout::Classic,
            primary_color: "#000000".to_string(),
            secondary_color: "#ffffff".to_string(),
            font_family: "Inter".to_string(),
            hero_image: String::new(),
        }
    }
}

/// Stored event document. `creator` and `invitation_code` are set once
/// at creation and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub venue: Venue,
    pub description: String,
    pub creator: Uuid,
    pub invitation_code: String,
    pub guests: Vec<Uuid>,
    pub contact_info: ContactInfo,
    pub schedule: Vec<ScheduleItem>,
    pub gift_info: GiftInfo,
    pub customization: Customization,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: Uuid,
    pub content: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
    pub images: Vec<String>,
    /// Each user id appears at most once.
    pub likes: Vec<Uuid>,
    /// Append order.
    pub comments: Vec<Comment>,
}

/// Field changes accepted by an event update. Identity, ownership and
/// invitation code have no slot here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub venue: Option<Venue>,
    pub description: Option<String>,
    pub contact_info: Option<ContactInfo>,
    pub schedule: Option<Vec<ScheduleItem>>,
    pub gift_info: Option<GiftInfo>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        *self == EventChanges::default()
    }

    pub fn apply(self, event: &mut Event) {
        if let Some(v) = self.title {
            event.title = v;
        }
        if let Some(v) = self.date {
            event.date = v;
        }
        if let Some(v) = self.venue {
            event.venue = v;
        }
        if let Some(v) = self.description {
            event.description = v;
        }
        if let Some(v) = self.contact_info {
            event.contact_info = v;
        }
        if let Some(v) = self.schedule {
            event.schedule = v;
        }
        if let Some(v) = self.gift_info {
            event.gift_info = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
}

impl ProfileChanges {
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.name {
            user.name = v;
        }
        if let Some(v) = self.bio {
            user.bio = v;
        }
        if let Some(v) = self.profile_photo {
            user.profile_photo = v;
        }
    }
}
