use actix_web::{
    error,
    http::StatusCode,
    HttpResponse,
};
use derive_more::Display;
use log::error;
use serde_json::json;

use crate::db::StoreError;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    NotFound(&'static str),

    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "Forbidden")]
    Forbidden,

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "Internal Server Error")]
    Internal,
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

impl error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(json!({ "error": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => AppError::Conflict(format!("{what} already exists")),
            StoreError::Backend(detail) => {
                error!("storage failure: {}", detail);
                AppError::Internal
            }
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        error!("blocking task failed: {}", err);
        AppError::Internal
    }
}

/// Turns extractor failures (bad JSON, bad query, bad path) into a
/// `Validation` response instead of actix's plain-text default.
pub fn extractor_error<E: std::fmt::Display>(err: E, _req: &actix_web::HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        assert_eq!(AppError::NotFound("Event not found").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::validation("bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("dup".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn backend_detail_is_not_leaked() {
        let err: AppError = StoreError::Backend("relation \"users\" does not exist".into()).into();
        assert_eq!(err, AppError::Internal);
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[test]
    fn duplicate_becomes_conflict() {
        let err: AppError = StoreError::Duplicate("User").into();
        assert_eq!(err, AppError::Conflict("User already exists".to_string()));
    }
}
