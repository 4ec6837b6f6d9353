//! Reqwest-backed resource API adapter.
//!
//! This adapter owns transport details only: URL building, optional request
//! timeout, HTTP status mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::debug;

use super::dto::{RecordDto, created_record, into_domain_records};
use crate::domain::ports::{Payload, ResourceApi, ResourceApiError};
use crate::domain::record::{Record, RecordId};

/// Reasons a [`RestResourceApi`] cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum RestResourceApiBuildError {
    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("base URL {0} cannot be used as an HTTP origin")]
    CannotBeABase(Url),
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Resource API adapter performing JSON requests against
/// `{base}/api/{resource}`.
pub struct RestResourceApi {
    client: Client,
    collection: Url,
}

impl RestResourceApi {
    /// Build an adapter for `resource` under `base`.
    ///
    /// Without a `timeout` requests wait for as long as the upstream takes.
    /// ```rust,ignore
    /// let base = Url::parse("http://localhost:3000")?;
    /// let api = RestResourceApi::new(&base, "empleados", None)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when `base` cannot hold a path or the reqwest client
    /// cannot be constructed.
    pub fn new(
        base: &Url,
        resource: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, RestResourceApiBuildError> {
        let collection = collection_url(base, resource)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            collection,
        })
    }

    /// `{base}/api/{resource}`.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn item_url(&self, id: &RecordId) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }
        url
    }
}

#[async_trait]
impl ResourceApi for RestResourceApi {
    async fn list(&self) -> Result<Vec<Record>, ResourceApiError> {
        debug!(url = %self.collection, "listing records");
        let response = self
            .client
            .get(self.collection.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| ResourceApiError::fetch(transport_message(&err)))?;
        let body = success_body(response)
            .await
            .map_err(ResourceApiError::fetch)?;
        let decoded: Vec<serde_json::Value> = serde_json::from_slice(&body).map_err(|err| {
            ResourceApiError::fetch(format!("invalid record list payload: {err}"))
        })?;
        Ok(into_domain_records(decoded))
    }

    async fn create(&self, payload: &Payload) -> Result<Option<Record>, ResourceApiError> {
        debug!(url = %self.collection, "creating record");
        let response = self
            .client
            .post(self.collection.clone())
            .json(payload)
            .send()
            .await
            .map_err(|err| ResourceApiError::create(transport_message(&err)))?;
        let body = success_body(response)
            .await
            .map_err(ResourceApiError::create)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let decoded: serde_json::Value = serde_json::from_slice(&body).map_err(|err| {
            ResourceApiError::create(format!("invalid record payload: {err}"))
        })?;
        created_record(decoded).map_err(ResourceApiError::create)
    }

    async fn update(&self, id: &RecordId, payload: &Payload) -> Result<Record, ResourceApiError> {
        let url = self.item_url(id);
        debug!(url = %url, "updating record");
        let response = self
            .client
            .put(url)
            .json(payload)
            .send()
            .await
            .map_err(|err| ResourceApiError::update(transport_message(&err)))?;
        let body = success_body(response)
            .await
            .map_err(ResourceApiError::update)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Record::new(id.clone(), payload.clone()));
        }
        let decoded: RecordDto = serde_json::from_slice(&body).map_err(|err| {
            ResourceApiError::update(format!("invalid record payload: {err}"))
        })?;
        decoded
            .into_domain_or(id, payload)
            .map_err(ResourceApiError::update)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ResourceApiError> {
        let url = self.item_url(id);
        debug!(url = %url, "deleting record");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|err| ResourceApiError::delete(transport_message(&err)))?;
        success_body(response)
            .await
            .map(|_| ())
            .map_err(ResourceApiError::delete)
    }
}

fn collection_url(base: &Url, resource: &str) -> Result<Url, RestResourceApiBuildError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| RestResourceApiBuildError::CannotBeABase(base.clone()))?
        .pop_if_empty()
        .extend(["api", resource]);
    Ok(url)
}

async fn success_body(response: Response) -> Result<Vec<u8>, String> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| transport_message(&err))?;
    if !status.is_success() {
        return Err(status_message(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        format!("transport error: {error}")
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let body_preview = body_preview(body);
    if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
