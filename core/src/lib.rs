//! # Fundref - fund referential domain core
//!
//! Platform-independent half of the fund referential frontend: the REST
//! contract, boundary normalization of server records, hierarchy graph
//! building and CSV preview. The browser crate only adds transport and views.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  REST JSON  │────▶│  Normalize  │────▶│  Hierarchy  │────▶│ Graph nodes │
//! │ (any shape) │     │  (aliases)  │     │  (builder)  │     │  + edges    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fundref::{build_hierarchy, parse_fund, parse_subtree, Depth};
//! use serde_json::json;
//!
//! let fund = parse_fund(&json!({"fund_id": "F1", "fund_name": "Alpha"})).unwrap();
//! let subtree = parse_subtree(
//!     &json!({"root": {"fund_id": "F1"}, "children": [{"subfund_id": "S1", "depth": 1}]}),
//!     Depth::default(),
//! )
//! .unwrap();
//! let graph = build_hierarchy(&fund, &subtree);
//! assert_eq!(graph.root().map(|n| n.label()), Some("Alpha"));
//! assert_eq!(graph.nodes.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - API base URL and list sizes
//! - [`models`] - Normalized records (Fund, SubFund, ShareClass, ...)
//! - [`api`] - Endpoints and response envelopes
//! - [`hierarchy`] - Graph building for the visualization
//! - [`pagination`] - Page arithmetic
//! - [`preview`] - CSV preview with encoding detection
//! - [`ingest`] - Upload slot state machine
//! - [`generation`] - Stale response guards

// Core modules
pub mod config;
pub mod error;
pub mod models;

// REST contract
pub mod api;

// Views
pub mod generation;
pub mod hierarchy;
pub mod pagination;

// Import
pub mod ingest;
pub mod preview;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ApiError, ApiResult, DepthError, NormalizeError, NormalizeResult, PreviewError,
    PreviewResult,
};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{
    ApiConfig, DEFAULT_BASE_URL, FUND_PAGE_SIZE, MANAGED_FUNDS_LIMIT, MANAGEMENT_LIST_LIMIT,
    PREVIEW_ROWS,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Depth, Fund, FundSummary, LegalEntity, ManagementEntity, ShareClass, SubFund, Subtree,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::{
    error_detail, parse_fund, parse_fund_page, parse_managed_funds, parse_management_entities,
    parse_hierarchy, parse_search_results, parse_subtree, Endpoint, IngestReceipt, Method, Page,
};

// =============================================================================
// Re-exports - Hierarchy
// =============================================================================

pub use hierarchy::{
    build_hierarchy, GraphEdge, GraphNode, HierarchyGraph, NodeEntity, NodeKind, NodeStyle,
    Position, Relation,
};

// =============================================================================
// Re-exports - Views and import
// =============================================================================

pub use generation::{RequestToken, RequestTracker};
pub use ingest::{Dataset, SlotStatus, SlotTicket, UploadSlot};
pub use pagination::{PageLink, Pagination};
pub use preview::{preview_bytes, preview_csv, CsvPreview};
