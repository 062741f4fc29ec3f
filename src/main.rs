use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use wedding_event_service::{
    config::{Config, StorageKind},
    db::{memory::MemoryStore, Database, PgStore, Store},
    handlers,
    service::{auth::SessionGate, log::{init_logger, AccessLog}},
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    init_logger();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()));
        }
    };

    let store: Arc<dyn Store> = match config.storage {
        StorageKind::Postgres => {
            let db_url = config.database_url.clone().unwrap_or_default();
            Arc::new(PgStore::new(Database::new(db_url, config.max_connections)))
        }
        StorageKind::Memory => {
            info!("using in-memory storage, data is lost on shutdown");
            Arc::new(MemoryStore::default())
        }
    };

    let bind = (config.host.clone(), config.port);
    let state = AppState::new(store, config);
    info!("listening on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(SessionGate::new(&state))
            .wrap(AccessLog)
            .configure(handlers::config)
    })
    .bind(bind)?
    .run()
    .await
}
