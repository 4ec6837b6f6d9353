//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::StateBuildError;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::Trace;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::pages::{
    begin_edit, cancel_edit, confirm_delete, delete_record, index, show_resource, submit_form,
};
use crate::inbound::http::state::HttpState;

/// Name of the session cookie holding form modes and notices.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Cookie session middleware carrying the per-browser form state.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    session_middleware_with(key, cookie_secure, SameSite::Lax)
}

fn session_middleware_with(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build()
}

/// Everything one application instance needs.
#[derive(Clone)]
pub struct AppDependencies {
    /// Health state shared with the server owner.
    pub health_state: web::Data<HealthState>,
    /// Resource table services.
    pub http_state: web::Data<HttpState>,
    /// Session signing key.
    pub key: Key,
    /// Whether the session cookie is `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy of the session cookie.
    pub same_site: SameSite,
}

/// Assemble the application: health checks, resource pages, sessions and tracing.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let pages = web::scope("")
        .wrap(session_middleware_with(key, cookie_secure, same_site))
        .service(index)
        .service(cancel_edit)
        .service(begin_edit)
        .service(confirm_delete)
        .service(delete_record)
        .service(show_resource)
        .service(submit_form);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(pages)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the resource state cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config).map_err(std::io::Error::other)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        api_base_url: _,
        request_timeout: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
