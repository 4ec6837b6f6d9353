//! Desk entry-point: loads settings, wires resource pages and starts the server.

use actix_web::cookie::SameSite;
use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;

use hotel_desk::inbound::http::health::HealthState;
use hotel_desk::server::{ServerConfig, create_server};
use hotel_desk::settings::{BuildMode, DeskSettings, SessionToggles};

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

    let settings = DeskSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let mode = BuildMode::from_debug_assertions();
    let toggles = SessionToggles::from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)?;
    let key = settings
        .session_key(mode, toggles.allow_ephemeral)
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(key, toggles.cookie_secure, SameSite::Lax, bind_addr)
        .with_request_timeout(settings.request_timeout());
    if let Some(base) = settings.api_base_url().map_err(std::io::Error::other)? {
        config = config.with_api_base_url(base);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
