//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod resource_api;

#[cfg(test)]
pub use resource_api::MockResourceApi;
pub use resource_api::{InMemoryResourceApi, Payload, ResourceApi, ResourceApiError};
