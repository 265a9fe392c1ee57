//! REST API contract.
//!
//! This module knows every endpoint the frontend consumes and how each
//! response body maps onto the internal records. The transport itself lives
//! with the caller (the browser client uses `gloo-net`).

pub mod endpoints;
pub mod types;

pub use endpoints::*;
pub use types::*;
