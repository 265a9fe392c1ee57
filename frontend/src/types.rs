//! Common types used across the frontend application.
//!
//! Domain records live in the `fundref` core crate; this module only holds
//! what is specific to presenting them.
//!
//! # Categories
//!
//! - **Notices** - Inline messages shown after a failed or completed action
//! - **Badges** - CSS classes for fund status badges

// =============================================================================
// Notices
// =============================================================================

/// Severity of an inline notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice notice-info",
            NoticeLevel::Success => "notice notice-success",
            NoticeLevel::Warning => "notice notice-warning",
            NoticeLevel::Error => "notice notice-error",
        }
    }
}

/// A message displayed inline in a view.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Local time the notice was raised (HH:MM:SS)
    pub timestamp: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }
}

// =============================================================================
// Badges
// =============================================================================

/// CSS classes of the badge shown for a fund status.
pub fn status_badge_class(status: Option<&str>) -> &'static str {
    let status = status.map(|s| s.trim().to_ascii_uppercase());
    match status.as_deref() {
        Some("ACTIVE") => "badge badge-success",
        Some("INACTIVE" | "CLOSED" | "LIQUIDATED") => "badge badge-error",
        Some("PENDING" | "SUSPENDED") => "badge badge-warning",
        _ => "badge badge-neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_badge_classes() {
        assert_eq!(status_badge_class(Some("ACTIVE")), "badge badge-success");
        assert_eq!(status_badge_class(Some(" active ")), "badge badge-success");
        assert_eq!(status_badge_class(Some("Liquidated")), "badge badge-error");
        assert_eq!(status_badge_class(Some("SUSPENDED")), "badge badge-warning");
        assert_eq!(status_badge_class(Some("DRAFT")), "badge badge-neutral");
        assert_eq!(status_badge_class(None), "badge badge-neutral");
    }

    #[test]
    fn test_notice_timestamp_format() {
        let notice = Notice::error("Could not fetch fund details");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.timestamp.len(), 8);
        assert_eq!(notice.timestamp.matches(':').count(), 2);
        assert_eq!(notice.level.css_class(), "notice notice-error");
    }
}
