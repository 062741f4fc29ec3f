pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;
pub mod validation;

use std::sync::Arc;

use config::Config;
use db::Store;
use service::jwt::TokenService;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";
/// Session tokens and cookies live exactly this many days.
pub const SESSION_TTL_DAYS: i64 = 7;

pub const STATUS_PAGE_SIZE: u64 = 5;
pub const EVENT_PAGE_SIZE: u64 = 10;
pub const USER_LIST_LIMIT: u64 = 10;

/// Process-wide state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            store,
            tokens,
            config: Arc::new(config),
        }
    }
}
