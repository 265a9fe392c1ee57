//! Client configuration.
//!
//! The API base URL is carried by an explicit [`ApiConfig`] value that is
//! handed to whatever issues requests. Nothing in this crate reads it from
//! global state.

use crate::api::Endpoint;

/// Base URL used when no other is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Funds shown per page in the fund list.
pub const FUND_PAGE_SIZE: usize = 10;

/// Management entities fetched for the side list.
pub const MANAGEMENT_LIST_LIMIT: usize = 100;

/// Funds fetched when listing everything a management entity administers.
pub const MANAGED_FUNDS_LIMIT: usize = 100;

/// Rows shown in a CSV preview.
pub const PREVIEW_ROWS: usize = 4;

/// Where the fund referential API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Create a config for the given base URL. Trailing slashes are dropped so
    /// endpoint paths can always start with `/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        Self {
            base_url: if trimmed.is_empty() {
                DEFAULT_BASE_URL.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    /// The configured base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint.
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        assert_eq!(ApiConfig::default().base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ApiConfig::new("https://api.example.org/v1//");
        assert_eq!(config.base_url(), "https://api.example.org/v1");
        assert_eq!(
            config.url(&Endpoint::Fund { id: "F1".into() }),
            "https://api.example.org/v1/funds/F1"
        );
    }

    #[test]
    fn test_blank_falls_back_to_default() {
        assert_eq!(ApiConfig::new("   ").base_url(), DEFAULT_BASE_URL);
    }
}
