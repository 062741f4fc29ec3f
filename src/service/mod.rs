pub mod auth;
pub mod crypto;
pub mod event;
pub mod feed;
pub mod jwt;
pub mod log;
pub mod user;
