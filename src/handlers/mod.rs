pub mod auth;
pub mod event;
pub mod status;
pub mod user;

use actix_web::web;

use crate::errors::extractor_error;

/// Mounts every resource and turns extractor failures into JSON
/// validation errors.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(extractor_error))
        .app_data(web::QueryConfig::default().error_handler(extractor_error))
        .app_data(web::PathConfig::default().error_handler(extractor_error))
        .service(web::scope("/auth").configure(auth::init_routes))
        .service(web::scope("/events").configure(event::init_routes))
        .service(web::scope("/statuses").configure(status::init_routes))
        .service(web::scope("/users").configure(user::init_routes));
}
