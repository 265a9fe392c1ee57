//! Application configuration.
//!
//! The API base URL is fixed at build time: set `FUNDREF_API_BASE` when
//! running `trunk build` to point the app at another server. Everything else
//! is a plain constant.

use fundref::ApiConfig;

/// Application name shown in the header and the document title.
pub const APP_NAME: &str = "Fund Referential";

/// Graph canvas size in CSS pixels.
pub const GRAPH_WIDTH: f64 = 960.0;
pub const GRAPH_HEIGHT: f64 = 600.0;

/// Minimap size in CSS pixels, drawn in the bottom-right corner of the canvas.
pub const MINIMAP_WIDTH: f64 = 180.0;
pub const MINIMAP_HEIGHT: f64 = 120.0;

/// Base URL baked in at compile time, if any.
pub const API_BASE_OVERRIDE: Option<&str> = option_env!("FUNDREF_API_BASE");

/// API configuration of this build.
pub fn api_config() -> ApiConfig {
    match API_BASE_OVERRIDE {
        Some(base) => ApiConfig::new(base),
        None => ApiConfig::default(),
    }
}
