//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **rest**: reqwest-backed client for the upstream `/api/{resource}`
//!   endpoints.
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod rest;
