//! HTTP inbound adapter serving the resource pages.

pub mod error;
pub mod health;
pub mod html;
pub mod pages;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
