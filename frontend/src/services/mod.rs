//! Backend services.
//!
//! This module provides services for talking to the REST API:
//!
//! # Services
//!
//! - [`api`] - Typed REST client ([`ApiClient`])
//! - [`upload`] - CSV ingestion upload and local file reading

pub mod api;
pub mod upload;

pub use api::*;
pub use upload::*;
