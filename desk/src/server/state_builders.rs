//! Builders for HTTP state from server configuration.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::ResourceApi;
use crate::domain::{ResourceCatalog, SchemaError};
use crate::inbound::http::state::HttpState;
use crate::outbound::rest::{RestResourceApi, RestResourceApiBuildError};

use super::ServerConfig;

/// Failures while assembling the HTTP state.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// The built-in resource catalog is inconsistent.
    #[error("invalid resource catalog: {0}")]
    Catalog(#[from] SchemaError),
    /// A REST adapter could not be constructed.
    #[error(transparent)]
    Rest(#[from] RestResourceApiBuildError),
}

/// Build the handler state: one REST adapter per resource when an upstream
/// is configured, otherwise in-memory stores.
pub(crate) fn build_http_state(config: &ServerConfig) -> Result<HttpState, StateBuildError> {
    let catalog = ResourceCatalog::builtin()?;
    match &config.api_base_url {
        Some(base) => {
            info!(api_base_url = %base, "serving resources from upstream REST API");
            let timeout = config.request_timeout;
            let state = HttpState::try_new(catalog, |schema| {
                let api = RestResourceApi::new(base, schema.slug(), timeout)?;
                Ok::<Arc<dyn ResourceApi>, RestResourceApiBuildError>(Arc::new(api))
            })?;
            Ok(state)
        }
        None => {
            warn!("no upstream API configured; serving in-memory resources");
            Ok(HttpState::in_memory(catalog))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use url::Url;

    fn config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("addr"),
        )
    }

    #[test]
    fn builds_in_memory_state_without_upstream() {
        let state = build_http_state(&config()).expect("state");
        assert!(state.table("reservaciones").is_ok());
    }

    #[test]
    fn builds_rest_state_with_upstream() {
        let base = Url::parse("http://127.0.0.1:3000").expect("url");
        let state = build_http_state(&config().with_api_base_url(base)).expect("state");
        assert_eq!(state.catalog().iter().count(), 3);
    }

    #[test]
    fn rejects_opaque_upstream_url() {
        let base = Url::parse("data:text/plain,hotel").expect("url");
        let err = build_http_state(&config().with_api_base_url(base)).err();
        assert!(matches!(err, Some(StateBuildError::Rest(_))));
    }
}
