//! Checks applied to incoming documents before anything is persisted.
//! Every failure is an `AppError::Validation` naming the offending field.

use crate::{
    dto::{NewCommentDto, NewEventDto, NewStatusDto, SignupRequest, UpdateProfileDto},
    errors::AppError,
    models::{Customization, EventChanges, ScheduleItem, Venue},
};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_TITLE_LEN: usize = 3;

fn required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

pub fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

pub fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn signup(req: &SignupRequest) -> Result<(), AppError> {
    required("name", &req.name)?;
    if !is_email(req.email.trim()) {
        return Err(AppError::validation("email is invalid"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn title(value: &str) -> Result<(), AppError> {
    if value.trim().chars().count() < MIN_TITLE_LEN {
        return Err(AppError::validation(format!(
            "title must be at least {MIN_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn venue(venue: &Venue) -> Result<(), AppError> {
    required("venue.name", &venue.name)?;
    required("venue.address", &venue.address)?;
    if !venue.maps_link.is_empty() && !is_http_url(&venue.maps_link) {
        return Err(AppError::validation("venue.mapsLink must be a valid URL"));
    }
    Ok(())
}

fn schedule(items: &[ScheduleItem]) -> Result<(), AppError> {
    for (i, item) in items.iter().enumerate() {
        required(&format!("schedule.{i}.time"), &item.time)?;
        required(&format!("schedule.{i}.activity"), &item.activity)?;
    }
    Ok(())
}

pub fn customization(c: &Customization) -> Result<(), AppError> {
    if !is_hex_color(&c.primary_color) {
        return Err(AppError::validation("customization.primaryColor must be a hex colour"));
    }
    if !is_hex_color(&c.secondary_color) {
        return Err(AppError::validation("customization.secondaryColor must be a hex colour"));
    }
    required("customization.fontFamily", &c.font_family)?;
    if !c.hero_image.is_empty() && !is_http_url(&c.hero_image) && !c.hero_image.starts_with('/') {
        return Err(AppError::validation("customization.heroImage must be a URL"));
    }
    Ok(())
}

pub fn new_event(dto: &NewEventDto) -> Result<(), AppError> {
    title(&dto.title)?;
    required("description", &dto.description)?;
    venue(&dto.venue)?;
    schedule(&dto.schedule)?;
    if let Some(c) = &dto.customization {
        customization(c)?;
    }
    Ok(())
}

pub fn event_changes(changes: &EventChanges) -> Result<(), AppError> {
    if let Some(v) = &changes.title {
        title(v)?;
    }
    if let Some(v) = &changes.description {
        required("description", v)?;
    }
    if let Some(v) = &changes.venue {
        venue(v)?;
    }
    if let Some(v) = &changes.schedule {
        schedule(v)?;
    }
    Ok(())
}

pub fn new_status(dto: &NewStatusDto) -> Result<(), AppError> {
    required("content", &dto.content)?;
    if dto.images.iter().any(|url| url.trim().is_empty()) {
        return Err(AppError::validation("images must not contain empty URLs"));
    }
    Ok(())
}

pub fn new_comment(dto: &NewCommentDto) -> Result<(), AppError> {
    required("content", &dto.content)
}

pub fn profile(dto: &UpdateProfileDto) -> Result<(), AppError> {
    if let Some(name) = &dto.name {
        required("name", name)?;
    }
    Ok(())
}
