//! REST outbound adapter.
//!
//! This module provides the reqwest implementation of the `ResourceApi` port
//! for `/api/{resource}` endpoints keyed by `_id`.

mod dto;
mod http_resource_api;

pub use http_resource_api::{RestResourceApi, RestResourceApiBuildError};
