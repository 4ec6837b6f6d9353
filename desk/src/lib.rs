//! Hotel front desk: server-rendered CRUD pages for employees, inventory and
//! reservations backed by a REST API.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Request tracing middleware attaching a `trace-id` to every response.
pub use middleware::Trace;
/// Correlation identifier available to handlers while a request is served.
pub use domain::TraceId;
