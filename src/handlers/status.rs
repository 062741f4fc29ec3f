use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    dto::{NewCommentDto, NewStatusDto, PageQuery},
    errors::AppError,
    service::{self, jwt::Identity},
    AppState,
};

#[get("")]
pub async fn get_page(query: web::Query<PageQuery>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let page = query.page()?;
    let feed = service::feed::get_page(page, state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(feed))
}

#[post("")]
pub async fn create(
    identity: Identity,
    dto: web::Json<NewStatusDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let status = service::feed::create(&identity, dto.into_inner(), state.store.as_ref()).await?;
    Ok(HttpResponse::Created().json(status))
}

#[post("/{id}/like")]
pub async fn like(identity: Identity, id: web::Path<Uuid>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let status = service::feed::toggle_like(id.into_inner(), &identity, state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[post("/{id}/comment")]
pub async fn comment(
    identity: Identity,
    id: web::Path<Uuid>,
    dto: web::Json<NewCommentDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let status = service::feed::add_comment(id.into_inner(), &identity, dto.into_inner(), state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(status))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_page)
        .service(create)
        .service(like)
        .service(comment);
}
