//! CRM server entry-point: loads settings, prepares the database and serves
//! the JSON API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crm::inbound::http::health::HealthState;
use crm::inbound::http::session_config::BuildMode;
use crm::outbound::persistence::{DbPool, run_migrations};
use server::{ServerConfig, ServerSettings, create_server, session_settings};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session =
        session_settings(BuildMode::from_debug_assertions()).map_err(std::io::Error::other)?;

    if settings.run_migrations() {
        run_migrations(&settings.database_url)
            .await
            .map_err(std::io::Error::other)?;
    }
    let pool = DbPool::new(settings.pool_config())
        .await
        .map_err(std::io::Error::other)?;

    let bind_addr = settings.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(session, bind_addr, pool))?;
    info!(%bind_addr, "serving CRM API");
    server.await
}
