use actix_web::{get, post, web, HttpResponse};
use log::info;

use crate::{
    dto::{AuthResponse, SessionResponse, SigninRequest, SignupRequest},
    errors::AppError,
    service::{
        self,
        auth::{cleared_session_cookie, session_cookie},
        jwt::Identity,
    },
    AppState,
};

#[post("/signup")]
pub async fn signup(dto: web::Json<SignupRequest>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (user, token) = service::user::signup(dto.into_inner(), &state).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, state.config.secure_cookies))
        .json(AuthResponse { user: user.into() }))
}

#[post("/signin")]
pub async fn signin(dto: web::Json<SigninRequest>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (user, token) = service::user::signin(dto.into_inner(), &state).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, state.config.secure_cookies))
        .json(AuthResponse { user: user.into() }))
}

#[get("/check")]
pub async fn check(identity: Option<Identity>, state: web::Data<AppState>) -> HttpResponse {
    let user = service::user::current(identity, state.store.as_ref()).await;
    HttpResponse::Ok().json(SessionResponse { user })
}

#[post("/signout")]
pub async fn signout(identity: Option<Identity>, state: web::Data<AppState>) -> HttpResponse {
    if let Some(identity) = identity {
        info!("user {} signed out", identity.id);
    }
    HttpResponse::Ok()
        .cookie(cleared_session_cookie(state.config.secure_cookies))
        .json(SessionResponse { user: None })
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(signin)
        .service(check)
        .service(signout);
}
