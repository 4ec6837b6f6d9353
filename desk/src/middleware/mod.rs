//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every page, currently trace
//! correlation and request logging.

pub mod trace;

pub use trace::Trace;
