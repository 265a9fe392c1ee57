//! Error types for the fund referential client.
//!
//! This module defines a small hierarchy of error types:
//!
//! - [`NormalizeError`] - API payloads that do not map onto the internal records
//! - [`DepthError`] - Hierarchy depth outside the supported range
//! - [`PreviewError`] - CSV preview failures
//! - [`ApiError`] - Top-level request errors (transport, status, decoding)
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Normalization Errors
// =============================================================================

/// Errors while mapping an external payload into an internal record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// A required field is absent (or empty) under every accepted alias.
    #[error("{entity} record is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A record was expected to be a JSON object.
    #[error("{entity} record is not a JSON object")]
    NotAnObject { entity: &'static str },

    /// The response envelope matches none of the accepted shapes.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// The hierarchy depth returned by the server is out of range.
    #[error(transparent)]
    Depth(#[from] DepthError),
}

// =============================================================================
// Depth Errors
// =============================================================================

/// Hierarchy depth outside `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Hierarchy depth must be between 1 and 3, got {0}")]
pub struct DepthError(pub i64);

// =============================================================================
// Preview Errors
// =============================================================================

/// Errors while building a CSV preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The file has no non-empty record.
    #[error("CSV file is empty")]
    EmptyFile,

    /// The csv reader rejected the content.
    #[error("Invalid CSV format: {0}")]
    Parse(#[from] csv::Error),
}

// =============================================================================
// API Errors (top-level)
// =============================================================================

/// Errors returned by every API call.
///
/// A non-success status is distinguishable only by its status code and the
/// optional `detail` message the server attached to the body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport failure, the request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    /// The body could not be decoded as JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The body decoded but does not fit the internal records.
    #[error("Invalid response: {0}")]
    Normalize(#[from] NormalizeError),

    /// The request could not be built (bad form data, bad URL).
    #[error("Failed to build request: {0}")]
    Request(String),
}

impl ApiError {
    /// Message suitable for an inline alert: the server detail when there is
    /// one, the full error text otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for CSV previews.
pub type PreviewResult<T> = Result<T, PreviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let missing = NormalizeError::MissingField {
            entity: "Fund",
            field: "fund_id",
        };
        let api_err: ApiError = missing.into();
        assert!(api_err.to_string().contains("fund_id"));

        let depth: NormalizeError = DepthError(7).into();
        assert!(depth.to_string().contains('7'));
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ApiError::Status {
            status: 400,
            detail: Some("Invalid target dataset".into()),
        };
        assert_eq!(err.user_message(), "Invalid target dataset");

        let bare = ApiError::Status {
            status: 502,
            detail: None,
        };
        assert!(bare.user_message().contains("502"));
        assert!(bare.user_message().contains("no detail"));
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let api_err: ApiError = err.into();
        assert!(matches!(api_err, ApiError::Decode(_)));
    }
}
