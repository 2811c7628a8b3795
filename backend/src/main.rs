//! Backend entry-point: loads settings, prepares the record store and serves
//! the REST API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use complaint_portal::inbound::http::health::HealthState;
use complaint_portal::inbound::http::state::AdminToken;
use complaint_portal::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use complaint_portal::server::{ServerConfig, ServerSettings, create_server};

async fn connect(database_url: &str, max_connections: u32) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations complete");

    DbPool::new(PoolConfig::new(database_url).with_max_size(max_connections))
        .await
        .map_err(|e| std::io::Error::other(format!("create database pool: {e}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("load settings: {e}")))?;

    let admin_token = settings.admin_token.clone().and_then(AdminToken::new);
    if admin_token.is_none() {
        warn!("no admin token configured; admin routes are open");
    }

    let mut config = ServerConfig::new(settings.bind_addr()).with_admin_token(admin_token);
    match settings.database_url() {
        Some(url) => {
            let pool = connect(url, settings.db_max_connections()).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; records are kept in memory"),
    }

    let (host, port) = config.bind_addr();
    info!(host, port, persistent = config.is_persistent(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
