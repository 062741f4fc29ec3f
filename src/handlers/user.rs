use actix_web::{get, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    dto::UpdateProfileDto,
    errors::AppError,
    service::{self, jwt::Identity},
    AppState, USER_LIST_LIMIT,
};

#[get("")]
pub async fn get_all(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = service::user::get_all(USER_LIST_LIMIT, state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/{id}")]
pub async fn get_by_id(id: web::Path<Uuid>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let user = service::user::get_by_id(id.into_inner(), state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/{id}")]
pub async fn update_profile(
    identity: Identity,
    id: web::Path<Uuid>,
    dto: web::Json<UpdateProfileDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = service::user::update_profile(id.into_inner(), dto.into_inner(), &identity, state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/{id}/events")]
pub async fn get_created_events(id: web::Path<Uuid>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let events = service::user::get_created_events(id.into_inner(), state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(events))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all)
        .service(get_by_id)
        .service(update_profile)
        .service(get_created_events);
}
