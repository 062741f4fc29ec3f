use chrono::Utc;
use log::{info, warn};
use uuid::Uuid;

use crate::{
    db::{Store, StoreError},
    dto::{EventPage, EventView, NewEventDto, UpdateEventDto},
    errors::AppError,
    models::{Customization, Event},
    validation, EVENT_PAGE_SIZE,
};

use super::{crypto, feed::page_window, jwt::Identity};

/// The creator is always the session identity and the invitation code is
/// generated here; neither is taken from the request.
pub async fn create(identity: &Identity, dto: NewEventDto, store: &dyn Store) -> Result<Event, AppError> {
    validation::new_event(&dto)?;
    let event = Event {
        id: Uuid::new_v4(),
        title: dto.title.trim().to_string(),
        date: dto.date,
        venue: dto.venue,
        description: dto.description,
        creator: identity.id,
        invitation_code: crypto::invitation_code(),
        guests: Vec::new(),
        contact_info: dto.contact_info,
        schedule: dto.schedule,
        gift_info: dto.gift_info,
        customization: dto.customization.unwrap_or_default(),
        created_at: Utc::now(),
    };
    let event = insert_with_fresh_code(event, store, crypto::invitation_code).await?;
    info!("event {} created by {}", event.id, identity.id);
    Ok(event)
}

/// Inserts the event, drawing one new invitation code if the first is taken.
pub async fn insert_with_fresh_code<F>(mut event: Event, store: &dyn Store, next_code: F) -> Result<Event, AppError>
where
    F: Fn() -> String,
{
    match store.insert_event(event.clone()).await {
        Err(StoreError::Duplicate(_)) => {
            warn!("invitation code collision for event {}, regenerating", event.id);
            event.invitation_code = next_code();
            Ok(store.insert_event(event).await?)
        }
        other => Ok(other?),
    }
}

pub async fn get_page(page: u64, store: &dyn Store) -> Result<EventPage, AppError> {
    let window = page_window(page, EVENT_PAGE_SIZE);
    let events = store.list_events(window.offset, window.limit).await?;
    let total = store.count_events().await?;
    Ok(EventPage {
        events: events.into_iter().map(EventView::from).collect(),
        has_more: window.has_more(total),
    })
}

pub async fn get_by_id(id: Uuid, store: &dyn Store) -> Result<EventView, AppError> {
    store
        .find_event(id)
        .await?
        .map(EventView::from)
        .ok_or(AppError::NotFound("Event not found"))
}

/// Loads the event and checks that `identity` created it.
pub async fn load_owned(id: Uuid, identity: &Identity, store: &dyn Store) -> Result<Event, AppError> {
    let event = store
        .find_event(id)
        .await?
        .ok_or(AppError::NotFound("Event not found"))?;
    if event.creator != identity.id {
        warn!("user {} denied write access to event {}", identity.id, id);
        return Err(AppError::Forbidden);
    }
    Ok(event)
}

pub async fn update(
    id: Uuid,
    dto: UpdateEventDto,
    identity: &Identity,
    store: &dyn Store,
) -> Result<EventView, AppError> {
    let current = load_owned(id, identity, store).await?;
    let changes = dto.into_changes();
    validation::event_changes(&changes)?;
    if changes.is_empty() {
        return Ok(current.into());
    }
    let updated = store
        .update_event(id, changes)
        .await?
        .ok_or(AppError::NotFound("Event not found"))?;
    info!("event {} updated by {}", id, identity.id);
    Ok(updated.into())
}

/// Replaces the whole customization block.
pub async fn customize(
    id: Uuid,
    customization: Customization,
    identity: &Identity,
    store: &dyn Store,
) -> Result<EventView, AppError> {
    load_owned(id, identity, store).await?;
    validation::customization(&customization)?;
    let updated = store
        .set_customization(id, customization)
        .await?
        .ok_or(AppError::NotFound("Event not found"))?;
    info!("event {} customized by {}", id, identity.id);
    Ok(updated.into())
}
