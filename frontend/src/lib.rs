//! Fund Referential - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for browsing funds, subfunds, share classes and
//! management entities, visualizing a fund's hierarchy as a graph, and
//! uploading referential CSV files.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (navigation)                                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Routes                                                      │
//! │  ├── /                        SearchPage                     │
//! │  ├── /funds                   FundListPage + ManagementList  │
//! │  ├── /visualization/:fund_id  GraphViewPage                  │
//! │  └── /import                  CsvImportPage                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Build-time API base URL and canvas sizes
//! - [`types`] - Notices and status badges
//! - [`components`] - UI components (pages, canvas, modals)
//! - [`services`] - REST client and CSV upload

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{status_badge_class, Notice, NoticeLevel};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Routes
// =============================================================================

/// Route of the graph view for a fund.
pub fn visualization_path(fund_id: &str) -> String {
    format!("/visualization/{}", urlencoding::encode(fund_id))
}

// =============================================================================
// Application
// =============================================================================

/// Root component. The API client is built once from the build
/// configuration and shared through context.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(ApiClient::new(api_config()));

    view! {
        <Title text=APP_NAME/>
        <Router>
            <Header/>
            <main class="container">
                <Routes>
                    <Route path="/" view=SearchPage/>
                    <Route path="/funds" view=FundListPage/>
                    <Route path="/visualization/:fund_id" view=GraphViewPage/>
                    <Route path="/import" view=CsvImportPage/>
                    <Route path="/*any" view=NotFound/>
                </Routes>
            </main>
            <Footer/>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="empty-state">
            <h2>"Page not found"</h2>
            <A href="/">"Back to search"</A>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualization_path_encodes_id() {
        assert_eq!(visualization_path("F001"), "/visualization/F001");
        assert_eq!(visualization_path("LU 01/2"), "/visualization/LU%2001%2F2");
    }
}
