use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use log::debug;

use crate::{errors::AppError, AppState, SESSION_COOKIE, SESSION_TTL_DAYS};

use super::jwt::{Identity, TokenService};

/// Http-only, same-site strict cookie scoped to the whole site.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(CookieDuration::days(SESSION_TTL_DAYS))
        .finish()
}

pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie("", secure);
    cookie.make_removal();
    cookie
}

/// Public single-event view: `/events/{id}` with nothing after the id.
pub fn is_event_detail(path: &str) -> bool {
    let mut segments = path.trim_end_matches('/').split('/').skip(1);
    matches!(
        (segments.next(), segments.next(), segments.next()),
        (Some("events"), Some(id), None) if !id.is_empty()
    )
}

/// The event collection `/events` is public to read.
pub fn is_event_collection(path: &str) -> bool {
    path.trim_end_matches('/') == "/events"
}

/// Only navigations are redirected; API writes fall through to the
/// `Identity` extractor and answer 401.
pub fn is_navigation(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Prefix match on whole path segments.
pub fn is_protected(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Verifies the session cookie once per request and stores the resulting
/// `Identity` in the request extensions. Page loads under protected
/// prefixes without a valid session are redirected to the login page.
pub struct SessionGate {
    tokens: TokenService,
    protected: Rc<Vec<String>>,
    login_path: Rc<String>,
}

impl SessionGate {
    pub fn new(state: &AppState) -> Self {
        Self {
            tokens: state.tokens.clone(),
            protected: Rc::new(state.config.protected_paths.clone()),
            login_path: Rc::new(state.config.login_path.clone()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Transform = SessionGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateService {
            service,
            tokens: self.tokens.clone(),
            protected: self.protected.clone(),
            login_path: self.login_path.clone(),
        }))
    }
}

pub struct SessionGateService<S> {
    service: S,
    tokens: TokenService,
    protected: Rc<Vec<String>>,
    login_path: Rc<String>,
}

impl<S> SessionGateService<S> {
    fn requires_session(&self, method: &Method, path: &str) -> bool {
        is_navigation(method)
            && is_protected(path, &self.protected)
            && !is_event_collection(path)
            && !is_event_detail(path)
    }
}

impl<S, B> Service<ServiceRequest> for SessionGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| self.tokens.verify(cookie.value()));

        if identity.is_none() && self.requires_session(req.method(), req.path()) {
            debug!("no session for {}, redirecting to {}", req.path(), self.login_path);
            let (request, _payload) = req.into_parts();
            let response = HttpResponse::Found()
                .insert_header((header::LOCATION, self.login_path.as_str()))
                .finish()
                .map_into_right_body();
            return Box::pin(async move { Ok(ServiceResponse::new(request, response)) });
        }

        if let Some(identity) = identity {
            req.extensions_mut().insert(identity);
        }
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// The identity established for this request, if any. Falls back to
/// verifying the cookie when no `SessionGate` ran.
pub fn authenticate(req: &HttpRequest) -> Option<Identity> {
    if let Some(identity) = req.extensions().get::<Identity>() {
        return Some(identity.clone());
    }
    let state = req.app_data::<web::Data<AppState>>()?;
    let cookie = req.cookie(SESSION_COOKIE)?;
    state.tokens.verify(cookie.value())
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).ok_or(AppError::Unauthorized))
    }
}
