//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::server::session_middleware;

/// Session middleware as wired in production, with a fresh key per
/// invocation and the `Secure` flag off for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(Key::generate(), false)
}
