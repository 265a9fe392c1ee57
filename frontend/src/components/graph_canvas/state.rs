use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use fundref::{HierarchyGraph, Relation};

/// Extra world-space slack around a node's radius when hit testing.
pub const HIT_SLOP: f64 = 4.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;

const FIT_PADDING: f64 = 80.0;
const MINIMAP_PADDING: f64 = 8.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
    pub id: String,
    pub label: String,
    pub color: &'static str,
    pub radius: f64,
}

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.x) / self.k, (sy - self.y) / self.k)
    }

    pub fn to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
        (gx * self.k + self.x, gy * self.k + self.y)
    }

    /// Zoom by `factor` keeping the graph point under `(sx, sy)` fixed.
    pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
        let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_k / self.k;
        self.x = sx - (sx - self.x) * ratio;
        self.y = sy - (sy - self.y) * ratio;
        self.k = new_k;
    }

    /// Move the view so graph point `(gx, gy)` sits at the canvas center.
    pub fn center_on(&mut self, gx: f64, gy: f64, width: f64, height: f64) {
        self.x = width / 2.0 - gx * self.k;
        self.y = height / 2.0 - gy * self.k;
    }
}

/// Axis-aligned rectangle in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Bounds {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Transform showing all of `bounds` inside a `width` x `height` canvas,
/// never zooming in past 1.
pub fn fit_transform(bounds: &Bounds, width: f64, height: f64) -> ViewTransform {
    let k = (width / (bounds.width() + FIT_PADDING))
        .min(height / (bounds.height() + FIT_PADDING))
        .clamp(MIN_ZOOM, 1.0);
    let mut transform = ViewTransform { x: 0.0, y: 0.0, k };
    let (cx, cy) = bounds.center();
    transform.center_on(cx, cy, width, height);
    transform
}

// =============================================================================
// Minimap
// =============================================================================

/// Maps graph space onto the minimap rectangle, keeping the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minimap {
    /// Minimap rectangle in screen space.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    scale: f64,
    origin_x: f64,
    origin_y: f64,
}

impl Minimap {
    /// Minimap anchored at the bottom-right corner of the canvas, covering
    /// `world`.
    pub fn new(world: &Bounds, canvas_w: f64, canvas_h: f64, map_w: f64, map_h: f64) -> Self {
        let x = canvas_w - map_w - MINIMAP_PADDING;
        let y = canvas_h - map_h - MINIMAP_PADDING;
        let inner_w = map_w - 2.0 * MINIMAP_PADDING;
        let inner_h = map_h - 2.0 * MINIMAP_PADDING;
        let scale = (inner_w / world.width().max(1.0)).min(inner_h / world.height().max(1.0));
        let (cx, cy) = world.center();
        Self {
            x,
            y,
            width: map_w,
            height: map_h,
            scale,
            origin_x: x + map_w / 2.0 - cx * scale,
            origin_y: y + map_h / 2.0 - cy * scale,
        }
    }

    pub fn project(&self, gx: f64, gy: f64) -> (f64, f64) {
        (gx * self.scale + self.origin_x, gy * self.scale + self.origin_y)
    }

    pub fn unproject(&self, mx: f64, my: f64) -> (f64, f64) {
        ((mx - self.origin_x) / self.scale, (my - self.origin_y) / self.scale)
    }

    pub fn contains(&self, sx: f64, sy: f64) -> bool {
        sx >= self.x && sx <= self.x + self.width && sy >= self.y && sy <= self.y + self.height
    }
}

// =============================================================================
// Interaction state
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct DragState {
    pub active: bool,
    pub node_idx: Option<DefaultNodeIdx>,
    pub start_x: f64,
    pub start_y: f64,
    pub node_start_x: f32,
    pub node_start_y: f32,
    pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
    pub active: bool,
    pub start_x: f64,
    pub start_y: f64,
    pub transform_start_x: f64,
    pub transform_start_y: f64,
    pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
    pub node: Option<DefaultNodeIdx>,
    pub neighbors: HashSet<DefaultNodeIdx>,
    /// Highlight intensity, eased toward 1 while hovering.
    pub highlight_t: f64,
}

/// Outcome of releasing the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerRelease {
    /// Clicked a node; carries the graph node id.
    Node(String),
    /// Clicked empty background.
    Background,
    /// Ended a drag or pan.
    Moved,
}

pub struct GraphCanvasState {
    pub graph: ForceGraph<NodeInfo, ()>,
    pub transform: ViewTransform,
    pub drag: DragState,
    pub pan: PanState,
    pub hover: HoverState,
    pub selected: Option<DefaultNodeIdx>,
    pub width: f64,
    pub height: f64,
    /// Permanently anchored; other nodes are pinned only while dragged.
    root: Option<DefaultNodeIdx>,
    edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
    relations: HashMap<(DefaultNodeIdx, DefaultNodeIdx), Relation>,
}

impl GraphCanvasState {
    /// Seed the simulation with the builder's positions. The root stays
    /// anchored.
    pub fn new(data: &HierarchyGraph, width: f64, height: f64) -> Self {
        let mut graph = ForceGraph::new(SimulationParameters {
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        });
        let mut ids = HashMap::new();
        let mut root = None;
        let mut edges = Vec::new();
        let mut relations = HashMap::new();

        for (i, node) in data.nodes.iter().enumerate() {
            let idx = graph.add_node(NodeData {
                x: node.position.x as f32,
                y: node.position.y as f32,
                mass: 10.0,
                is_anchor: i == 0,
                user_data: NodeInfo {
                    id: node.id.clone(),
                    label: node.label().to_string(),
                    color: node.style.color,
                    radius: node.style.radius,
                },
            });
            if i == 0 {
                root = Some(idx);
            }
            ids.insert(node.id.clone(), idx);
        }

        for edge in &data.edges {
            if let (Some(&src), Some(&tgt)) = (ids.get(&edge.source), ids.get(&edge.target)) {
                graph.add_edge(src, tgt, EdgeData::default());
                edges.push((src, tgt));
                relations.insert((src, tgt), edge.relation);
            }
        }

        let transform = Bounds::of_points(data.nodes.iter().map(|n| (n.position.x, n.position.y)))
            .map(|b| fit_transform(&b, width, height))
            .unwrap_or(ViewTransform {
                x: width / 2.0,
                y: height / 2.0,
                k: 1.0,
            });

        Self {
            graph,
            transform,
            drag: DragState::default(),
            pan: PanState::default(),
            hover: HoverState::default(),
            selected: None,
            width,
            height,
            root,
            edges,
            relations,
        }
    }

    pub fn relation(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> Option<Relation> {
        self.relations.get(&(src, tgt)).copied()
    }

    pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
        let mut found = None;
        self.graph.visit_nodes(|node| {
            if node.index() == idx {
                found = Some((node.x() as f64, node.y() as f64));
            }
        });
        found
    }

    /// Closest node whose disc (plus slop) contains the screen point.
    pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
        let (gx, gy) = self.transform.to_graph(sx, sy);
        let mut best: Option<(f64, DefaultNodeIdx)> = None;
        self.graph.visit_nodes(|node| {
            let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
            let dist = (dx * dx + dy * dy).sqrt();
            let reach = node.data.user_data.radius + HIT_SLOP;
            if dist < reach && best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, node.index()));
            }
        });
        best.map(|(_, idx)| idx)
    }

    pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
        let mut found = None;
        self.graph.visit_nodes(|node| {
            if node.index() == idx {
                found = Some(node.data.user_data.id.clone());
            }
        });
        found
    }

    /// Graph-space rectangle currently visible on the canvas.
    pub fn viewport(&self) -> Bounds {
        let (x0, y0) = self.transform.to_graph(0.0, 0.0);
        let (x1, y1) = self.transform.to_graph(self.width, self.height);
        Bounds {
            min_x: x0,
            min_y: y0,
            max_x: x1,
            max_y: y1,
        }
    }

    /// Bounds of every node, current positions.
    pub fn node_bounds(&self) -> Option<Bounds> {
        let mut points = Vec::new();
        self.graph
            .visit_nodes(|node| points.push((node.x() as f64, node.y() as f64)));
        Bounds::of_points(points)
    }

    pub fn minimap(&self, map_w: f64, map_h: f64) -> Minimap {
        let viewport = self.viewport();
        let world = self
            .node_bounds()
            .map(|b| b.union(&viewport))
            .unwrap_or(viewport);
        Minimap::new(&world, self.width, self.height, map_w, map_h)
    }

    // =========================================================================
    // Pointer handling
    // =========================================================================

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some(idx) = self.node_at_position(x, y) {
            let (nx, ny) = self.node_position(idx).unwrap_or((0.0, 0.0));
            self.drag = DragState {
                active: true,
                node_idx: Some(idx),
                start_x: x,
                start_y: y,
                node_start_x: nx as f32,
                node_start_y: ny as f32,
                moved: false,
            };
        } else {
            self.pan = PanState {
                active: true,
                start_x: x,
                start_y: y,
                transform_start_x: self.transform.x,
                transform_start_y: self.transform.y,
                moved: false,
            };
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.drag.active {
            let hovered = self.node_at_position(x, y);
            self.set_hover(hovered);
        }

        if self.drag.active {
            if (x - self.drag.start_x).hypot(y - self.drag.start_y) > CLICK_TOLERANCE {
                self.drag.moved = true;
            }
            if let (Some(idx), true) = (self.drag.node_idx, self.drag.moved) {
                let (dx, dy) = (
                    (x - self.drag.start_x) / self.transform.k,
                    (y - self.drag.start_y) / self.transform.k,
                );
                let (nx, ny) = (
                    self.drag.node_start_x + dx as f32,
                    self.drag.node_start_y + dy as f32,
                );
                self.graph.visit_nodes_mut(|node| {
                    if node.index() == idx {
                        node.data.x = nx;
                        node.data.y = ny;
                        node.data.is_anchor = true;
                    }
                });
            }
        } else if self.pan.active {
            if (x - self.pan.start_x).hypot(y - self.pan.start_y) > CLICK_TOLERANCE {
                self.pan.moved = true;
            }
            self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
            self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
        }
    }

    /// End a press. A press that barely moved is a click: it selects the
    /// node under it, or clears the selection on the background.
    pub fn pointer_up(&mut self) -> PointerRelease {
        let release = if self.drag.active && !self.drag.moved {
            self.selected = self.drag.node_idx;
            self.drag
                .node_idx
                .and_then(|idx| self.node_id(idx))
                .map(PointerRelease::Node)
                .unwrap_or(PointerRelease::Background)
        } else if self.pan.active && !self.pan.moved {
            self.selected = None;
            PointerRelease::Background
        } else {
            PointerRelease::Moved
        };
        if let Some(idx) = self.drag.node_idx.filter(|idx| Some(*idx) != self.root) {
            self.release_anchor(idx);
        }
        self.drag = DragState::default();
        self.pan = PanState::default();
        release
    }

    pub fn pointer_leave(&mut self) {
        if let Some(idx) = self.drag.node_idx.filter(|idx| Some(*idx) != self.root) {
            self.release_anchor(idx);
        }
        self.drag = DragState::default();
        self.pan = PanState::default();
        self.set_hover(None);
    }

    /// Whether the simulation currently holds `idx` in place.
    pub fn is_anchored(&self, idx: DefaultNodeIdx) -> bool {
        let mut anchored = false;
        self.graph.visit_nodes(|node| {
            if node.index() == idx {
                anchored = node.data.is_anchor;
            }
        });
        anchored
    }

    fn release_anchor(&mut self, idx: DefaultNodeIdx) {
        self.graph.visit_nodes_mut(|node| {
            if node.index() == idx {
                node.data.is_anchor = false;
            }
        });
    }

    pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
        if self.hover.node == node {
            return;
        }
        self.hover.node = node;
        self.hover.neighbors.clear();
        if let Some(idx) = node {
            for &(src, tgt) in &self.edges {
                if src == idx {
                    self.hover.neighbors.insert(tgt);
                } else if tgt == idx {
                    self.hover.neighbors.insert(src);
                }
            }
        }
    }

    pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
        self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
    }

    pub fn tick(&mut self, dt: f32) {
        self.graph.update(dt);

        let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
        self.hover.highlight_t += (target - self.hover.highlight_t) * 1.5 * dt as f64;
        if self.hover.highlight_t < 0.01 && self.hover.node.is_none() {
            self.hover.highlight_t = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundref::{build_hierarchy, Depth, Fund, Subtree};
    use serde_json::json;

    fn index_of(state: &GraphCanvasState, id: &str) -> Option<DefaultNodeIdx> {
        let mut found = None;
        state.graph.visit_nodes(|node| {
            if node.data.user_data.id == id {
                found = Some(node.index());
            }
        });
        found
    }

    fn sample_graph() -> HierarchyGraph {
        let root = Fund::from_value(&json!({
            "fund_id": "F1",
            "fund_name": "Alpha",
            "management_entity": {"mgmt_id": "M1"},
            "share_classes": [{"id": "SC1"}, {"id": "SC2"}]
        }))
        .unwrap();
        let subtree = Subtree {
            root: root.clone(),
            children: vec![],
            depth: Depth::default(),
        };
        build_hierarchy(&root, &subtree)
    }

    #[test]
    fn test_transform_round_trip() {
        let t = ViewTransform {
            x: 120.0,
            y: -40.0,
            k: 2.5,
        };
        let (sx, sy) = t.to_screen(10.0, 20.0);
        assert_eq!((sx, sy), (145.0, 10.0));
        let (gx, gy) = t.to_graph(sx, sy);
        assert!((gx - 10.0).abs() < 1e-9 && (gy - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_keeps_point_under_cursor() {
        let mut t = ViewTransform {
            x: 300.0,
            y: 200.0,
            k: 1.0,
        };
        let before = t.to_graph(400.0, 250.0);
        t.zoom_at(400.0, 250.0, 1.1);
        let after = t.to_graph(400.0, 250.0);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut t = ViewTransform::default();
        for _ in 0..100 {
            t.zoom_at(0.0, 0.0, 1.1);
        }
        assert_eq!(t.k, MAX_ZOOM);
        for _ in 0..200 {
            t.zoom_at(0.0, 0.0, 0.9);
        }
        assert_eq!(t.k, MIN_ZOOM);
    }

    #[test]
    fn test_fit_centers_bounds() {
        let bounds = Bounds {
            min_x: -260.0,
            min_y: -140.0,
            max_x: 420.0,
            max_y: 0.0,
        };
        let t = fit_transform(&bounds, 960.0, 600.0);
        let (sx, sy) = t.to_screen(80.0, -70.0);
        assert!((sx - 480.0).abs() < 1e-9);
        assert!((sy - 300.0).abs() < 1e-9);
        assert!(t.k <= 1.0);
    }

    #[test]
    fn test_hit_testing_finds_seeded_nodes() {
        let graph = sample_graph();
        let state = GraphCanvasState::new(&graph, 960.0, 600.0);

        let (sx, sy) = state.transform.to_screen(0.0, 0.0);
        let hit = state.node_at_position(sx, sy).unwrap();
        assert_eq!(state.node_id(hit).as_deref(), Some("F1"));

        let (sx, sy) = state.transform.to_screen(-260.0, 0.0);
        let hit = state.node_at_position(sx, sy).unwrap();
        assert_eq!(state.node_id(hit).as_deref(), Some("mgmt_M1"));

        let (sx, sy) = state.transform.to_screen(-130.0, 60.0);
        assert!(state.node_at_position(sx, sy).is_none());
    }

    #[test]
    fn test_click_selects_and_background_clears() {
        let graph = sample_graph();
        let mut state = GraphCanvasState::new(&graph, 960.0, 600.0);

        let (sx, sy) = state.transform.to_screen(260.0, -140.0);
        state.pointer_down(sx, sy);
        assert_eq!(state.pointer_up(), PointerRelease::Node("SC1".into()));
        assert_eq!(state.selected, index_of(&state, "SC1"));

        state.pointer_down(5.0, 5.0);
        assert_eq!(state.pointer_up(), PointerRelease::Background);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_drag_moves_node_without_selecting() {
        let graph = sample_graph();
        let mut state = GraphCanvasState::new(&graph, 960.0, 600.0);
        let idx = index_of(&state, "SC2").unwrap();

        let (sx, sy) = state.transform.to_screen(420.0, -140.0);
        state.pointer_down(sx, sy);
        state.pointer_move(sx + 40.0, sy + 40.0);
        assert_eq!(state.pointer_up(), PointerRelease::Moved);
        assert!(state.selected.is_none());

        let (x, _) = state.node_position(idx).unwrap();
        assert!(x > 420.0);
    }

    #[test]
    fn test_dragged_node_is_released_but_root_stays_anchored() {
        let graph = sample_graph();
        let mut state = GraphCanvasState::new(&graph, 960.0, 600.0);
        let class = index_of(&state, "SC1").unwrap();
        let root = index_of(&state, "F1").unwrap();

        let (sx, sy) = state.transform.to_screen(260.0, -140.0);
        state.pointer_down(sx, sy);
        state.pointer_move(sx + 40.0, sy + 40.0);
        assert!(state.is_anchored(class));
        state.pointer_up();
        assert!(!state.is_anchored(class));

        let (sx, sy) = state.transform.to_screen(0.0, 0.0);
        state.pointer_down(sx, sy);
        state.pointer_move(sx + 40.0, sy + 40.0);
        state.pointer_up();
        assert!(state.is_anchored(root));
    }

    #[test]
    fn test_hover_collects_neighbors() {
        let graph = sample_graph();
        let mut state = GraphCanvasState::new(&graph, 960.0, 600.0);
        let root = index_of(&state, "F1").unwrap();
        state.set_hover(Some(root));
        assert_eq!(state.hover.neighbors.len(), 3);
        assert!(state.is_highlighted(index_of(&state, "SC2").unwrap()));
    }

    #[test]
    fn test_relations_kept() {
        let graph = sample_graph();
        let state = GraphCanvasState::new(&graph, 960.0, 600.0);
        let mgmt = index_of(&state, "mgmt_M1").unwrap();
        let root = index_of(&state, "F1").unwrap();
        assert_eq!(state.relation(mgmt, root), Some(Relation::Manages));
    }

    #[test]
    fn test_minimap_projection() {
        let world = Bounds {
            min_x: -100.0,
            min_y: -50.0,
            max_x: 100.0,
            max_y: 50.0,
        };
        let map = Minimap::new(&world, 960.0, 600.0, 180.0, 120.0);

        assert!(map.contains(960.0 - 100.0, 600.0 - 60.0));
        assert!(!map.contains(10.0, 10.0));

        let (cx, cy) = map.project(0.0, 0.0);
        assert!((cx - (map.x + 90.0)).abs() < 1e-9);
        assert!((cy - (map.y + 60.0)).abs() < 1e-9);

        for (gx, gy) in [(-100.0, -50.0), (100.0, 50.0)] {
            let (mx, my) = map.project(gx, gy);
            assert!(map.contains(mx, my));
            let (ux, uy) = map.unproject(mx, my);
            assert!((ux - gx).abs() < 1e-9 && (uy - gy).abs() < 1e-9);
        }
    }

    #[test]
    fn test_viewport_covers_canvas() {
        let graph = sample_graph();
        let state = GraphCanvasState::new(&graph, 960.0, 600.0);
        let viewport = state.viewport();
        assert!((viewport.width() - 960.0 / state.transform.k).abs() < 1e-9);
        assert!((viewport.height() - 600.0 / state.transform.k).abs() < 1e-9);
    }
}
