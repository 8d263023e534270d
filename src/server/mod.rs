//! Request handling layer.
//!
//! Handlers in [`endpoints`] turn raw request values into use case calls,
//! [`errors`] maps failures onto `tonic` status codes.

pub mod errors;

mod endpoints;
pub use endpoints::*;
