//! Canvas rendering of a hierarchy graph.
//!
//! Layout refinement is delegated to `force_graph`, seeded with the
//! builder's positions. The canvas supports node dragging, background
//! panning, wheel zoom, hover highlighting of neighbours, click-to-select
//! and a minimap with the current viewport.

mod component;
mod render;
mod state;

pub use component::GraphCanvas;
