use actix_web::web;
use log::{error, info, warn};
use uuid::Uuid;

use crate::{
    db::Store,
    dto::{EventView, PublicUser, SigninRequest, SignupRequest, UpdateProfileDto},
    errors::AppError,
    models::User,
    validation, AppState, EVENT_PAGE_SIZE,
};

use super::{crypto, jwt::Identity};

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates the account and returns it together with a fresh session token.
pub async fn signup(dto: SignupRequest, state: &AppState) -> Result<(User, String), AppError> {
    validation::signup(&dto)?;
    let SignupRequest { name, email, password } = dto;
    let email = normalize_email(&email);

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let cost = state.config.bcrypt_cost;
    let password_hash = web::block(move || crypto::hash_password(&password, cost))
        .await?
        .map_err(|err| {
            error!("password hashing failed: {}", err);
            AppError::Internal
        })?;

    let user = state
        .store
        .insert_user(User {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email,
            password_hash,
            profile_photo: String::new(),
            bio: String::new(),
            created_events: Vec::new(),
        })
        .await?;
    let token = state.tokens.issue(user.id, &user.email)?;
    info!("user {} signed up", user.id);
    Ok((user, token))
}

/// Unknown email is `NotFound`; a wrong password is `Validation`.
pub async fn signin(dto: SigninRequest, state: &AppState) -> Result<(User, String), AppError> {
    let email = normalize_email(&dto.email);
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    let password = dto.password;
    let hash = user.password_hash.clone();
    let matches = web::block(move || crypto::verify_password(&password, &hash)).await?;
    if !matches {
        warn!("rejected sign-in for user {}", user.id);
        return Err(AppError::validation("Invalid credentials"));
    }

    let token = state.tokens.issue(user.id, &user.email)?;
    info!("user {} signed in", user.id);
    Ok((user, token))
}

/// The signed-in user, or `None` for no session or a vanished account.
pub async fn current(identity: Option<Identity>, store: &dyn Store) -> Option<PublicUser> {
    let identity = identity?;
    match store.find_user(identity.id).await {
        Ok(user) => user.map(PublicUser::from),
        Err(err) => {
            error!("session lookup failed: {}", err);
            None
        }
    }
}

pub async fn get_by_id(id: Uuid, store: &dyn Store) -> Result<PublicUser, AppError> {
    store
        .find_user(id)
        .await?
        .map(PublicUser::from)
        .ok_or(AppError::NotFound("User not found"))
}

pub async fn get_all(limit: u64, store: &dyn Store) -> Result<Vec<PublicUser>, AppError> {
    let users = store.list_users(limit).await?;
    Ok(users.into_iter().map(PublicUser::from).collect())
}

pub async fn update_profile(
    id: Uuid,
    dto: UpdateProfileDto,
    identity: &Identity,
    store: &dyn Store,
) -> Result<PublicUser, AppError> {
    if identity.id != id {
        warn!("user {} tried to edit profile {}", identity.id, id);
        return Err(AppError::Forbidden);
    }
    validation::profile(&dto)?;
    store
        .update_profile(id, dto.into_changes())
        .await?
        .map(PublicUser::from)
        .ok_or(AppError::NotFound("User not found"))
}

pub async fn get_created_events(id: Uuid, store: &dyn Store) -> Result<Vec<EventView>, AppError> {
    let events = store.events_by_creator(id, EVENT_PAGE_SIZE).await?;
    Ok(events.into_iter().map(EventView::from).collect())
}
