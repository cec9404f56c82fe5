use crate::core::config::DatabaseConfig;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::time::Duration;

pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.username)
        .password(&config.password)
        .ssl_mode(config.ssl_mode.into())
        .application_name(env!("CARGO_PKG_NAME"));

    match &config.ssl_root_cert {
        Some(path) => options.ssl_root_cert(path),
        None => options,
    }
}

/// Create the connection pool without connecting.
///
/// Connections are opened on first use, so an unreachable database surfaces
/// as a per-request error instead of preventing startup.
pub fn create_pool(config: &DatabaseConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_lazy_with(connect_options(config))
}
