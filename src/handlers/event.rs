use actix_web::{get, post, put, web, HttpResponse};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::{NewEventDto, PageQuery, UpdateEventDto},
    errors::AppError,
    models::Customization,
    service::{self, jwt::Identity},
    AppState,
};

#[get("")]
pub async fn get_page(query: web::Query<PageQuery>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let page = query.page()?;
    let events = service::event::get_page(page, state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// Only the creator ever sees the invitation code, in this response.
#[post("")]
pub async fn create(
    identity: Identity,
    dto: web::Json<NewEventDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let event = service::event::create(&identity, dto.into_inner(), state.store.as_ref()).await?;
    Ok(HttpResponse::Created().json(event))
}

#[get("/{id}")]
pub async fn get_by_id(id: web::Path<Uuid>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let event = service::event::get_by_id(id.into_inner(), state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[put("/{id}")]
pub async fn update(
    identity: Identity,
    id: web::Path<Uuid>,
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let dto = UpdateEventDto::from_body(body.into_inner())?;
    let event = service::event::update(id.into_inner(), dto, &identity, state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[put("/{id}/customize")]
pub async fn customize(
    identity: Identity,
    id: web::Path<Uuid>,
    body: web::Json<Customization>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let event = service::event::customize(id.into_inner(), body.into_inner(), &identity, state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(event))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_page)
        .service(create)
        .service(get_by_id)
        .service(update)
        .service(customize);
}
