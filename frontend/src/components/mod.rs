//! UI Components for the Fund Referential application.
//!
//! This module contains all Leptos components organized by function:
//!
//! # Layout Components
//! - [`Header`] - Navigation bar
//! - [`Footer`] - Page footer with the API base URL
//! - [`Modal`] - Overlay dialog
//! - [`PaginationControl`] - Page links under a list
//! - [`NoticeBanner`] - Inline status message
//!
//! # Pages
//! - [`SearchPage`] - Free-text fund search
//! - [`FundListPage`] - Paged fund list and management entities
//! - [`GraphViewPage`] - Interactive hierarchy graph of one fund
//! - [`CsvImportPage`] - Per-dataset CSV upload with preview
//!
//! # Feature Components
//! - [`FundDetailModal`] - Full record of a fund
//! - [`ManagedFundsModal`] - Funds administered by a management entity
//! - [`GraphCanvas`] - Canvas rendering of a hierarchy graph

mod csv_import;
mod footer;
mod fund_detail;
mod fund_list;
mod graph_canvas;
mod graph_view;
mod header;
mod managed_funds;
mod modal;
mod notice;
mod pagination;
mod search;

pub use csv_import::*;
pub use footer::*;
pub use fund_detail::*;
pub use fund_list::*;
pub use graph_canvas::*;
pub use graph_view::*;
pub use header::*;
pub use managed_funds::*;
pub use modal::*;
pub use notice::*;
pub use pagination::*;
pub use search::*;
