//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use url::Url;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) api_base_url: Option<Url>,
    pub(crate) request_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Construct a server configuration serving in-memory resources.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            api_base_url: None,
            request_timeout: None,
        }
    }

    /// Proxy every resource to the REST API at `base`.
    #[must_use]
    pub fn with_api_base_url(mut self, base: Url) -> Self {
        self.api_base_url = Some(base);
        self
    }

    /// Bound each upstream request by `timeout`.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the upstream REST origin, if any.
    #[must_use]
    pub fn api_base_url(&self) -> Option<&Url> {
        self.api_base_url.as_ref()
    }
}
