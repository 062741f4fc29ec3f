use std::future::{ready, Ready};
use std::io::Write;
use std::time::Instant;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use colored::Colorize;
use env_logger::Builder;
use futures_util::future::LocalBoxFuture;
use log::{info, warn, Level, LevelFilter};

/// One line per request and one per response, with the handling time.
pub struct AccessLog;

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService { service }))
    }
}

pub struct AccessLogService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        info!("--> {} {}", method, req.uri());
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let elapsed = started.elapsed().as_millis();
            if res.status().is_server_error() {
                warn!("<-- {} {} {} ({} ms)", method, path, res.status(), elapsed);
            } else {
                info!("<-- {} {} {} ({} ms)", method, path, res.status(), elapsed);
            }
            Ok(res)
        })
    }
}

fn paint_level(level: Level) -> colored::ColoredString {
    let label = level.as_str();
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow().bold(),
        Level::Info => label.green().bold(),
        Level::Debug => label.blue().bold(),
        Level::Trace => label.magenta().bold(),
    }
}

/// Installs the global logger. `RUST_LOG` overrides the `info` default.
pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                paint_level(record.level()),
                record.target(),
                record.args()
            )
        })
        .init()
}
