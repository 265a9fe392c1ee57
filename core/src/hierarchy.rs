//! Fund hierarchy graph construction.
//!
//! [`build_hierarchy`] turns a root fund and the result of a depth-bounded
//! children fetch into a flat node list and edge list, in a fixed order:
//!
//! ```text
//!                  ┌──────────┐  has class   ┌─────┐ ┌─────┐
//!   ┌──────┐manages│   root   │─────────────▶│ SC1 │ │ SC2 │ ...
//!   │ mgmt │──────▶│  (Fund)  │              └─────┘ └─────┘
//!   └──────┘       └──────────┘
//!                       │ parent
//!              ┌────────┼────────┐
//!            ┌───┐    ┌───┐    ┌───┐      depth 1
//!            │SF1│    │SF2│    │SF3│
//!            └───┘    └───┘    └───┘
//!              │ parent                   depth 2 ...
//! ```
//!
//! Positions are cosmetic seeds for the canvas layout; nothing here resolves
//! overlaps. Every call returns a brand new graph.

use std::collections::{HashMap, HashSet};

use crate::models::{Depth, Fund, ManagementEntity, ShareClass, SubFund, Subtree};

/// Prefix namespacing management entity node ids away from fund ids.
pub const MANAGEMENT_PREFIX: &str = "mgmt_";

const MANAGEMENT_OFFSET_X: f64 = -260.0;
const SHARE_CLASS_OFFSET_X: f64 = 260.0;
const SHARE_CLASS_SPACING: f64 = 160.0;
const SHARE_CLASS_OFFSET_Y: f64 = -140.0;
const SUBFUND_SPACING: f64 = 180.0;
const LEVEL_HEIGHT: f64 = 200.0;

// =============================================================================
// Node kinds
// =============================================================================

/// What a node stands for. Attached at construction, never inferred from ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Fund,
    SubFund,
    ShareClass,
    ManagementEntity,
}

impl NodeKind {
    /// Every kind, in legend order.
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Fund,
        NodeKind::SubFund,
        NodeKind::ShareClass,
        NodeKind::ManagementEntity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Fund => "Fund",
            NodeKind::SubFund => "Subfund",
            NodeKind::ShareClass => "Share class",
            NodeKind::ManagementEntity => "Management entity",
        }
    }

    pub fn style(&self) -> NodeStyle {
        match self {
            NodeKind::Fund => NodeStyle {
                color: "#1976d2",
                radius: 9.0,
            },
            NodeKind::SubFund => NodeStyle {
                color: "#dc004e",
                radius: 7.0,
            },
            NodeKind::ShareClass => NodeStyle {
                color: "#388e3c",
                radius: 6.0,
            },
            NodeKind::ManagementEntity => NodeStyle {
                color: "#f57c00",
                radius: 8.0,
            },
        }
    }
}

/// The record behind a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEntity {
    Fund(Fund),
    SubFund(SubFund),
    ShareClass(ShareClass),
    ManagementEntity(ManagementEntity),
}

impl NodeEntity {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeEntity::Fund(_) => NodeKind::Fund,
            NodeEntity::SubFund(_) => NodeKind::SubFund,
            NodeEntity::ShareClass(_) => NodeKind::ShareClass,
            NodeEntity::ManagementEntity(_) => NodeKind::ManagementEntity,
        }
    }

    /// Entity id as the API knows it (without any namespacing prefix).
    pub fn entity_id(&self) -> &str {
        match self {
            NodeEntity::Fund(f) => &f.id,
            NodeEntity::SubFund(s) => &s.id,
            NodeEntity::ShareClass(s) => &s.id,
            NodeEntity::ManagementEntity(m) => &m.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeEntity::Fund(f) => f.label(),
            NodeEntity::SubFund(s) => s.label(),
            NodeEntity::ShareClass(s) => s.label(),
            NodeEntity::ManagementEntity(m) => m.label(),
        }
    }

    /// Key fields shown by the inspector, absent ones omitted.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let fields: Vec<(&'static str, Option<String>)> = match self {
            NodeEntity::Fund(f) => vec![
                ("Code", f.code.clone()),
                ("Type", f.fund_type.clone()),
                ("Status", f.status.clone()),
                ("Currency", f.currency.clone()),
                ("Domicile", f.domicile.clone()),
            ],
            NodeEntity::SubFund(s) => vec![
                ("Currency", s.currency.clone()),
                ("Depth", s.depth.map(|d| d.to_string())),
                ("Parent", s.parent_id.clone()),
            ],
            NodeEntity::ShareClass(s) => vec![
                ("Currency", s.currency.clone()),
                ("Distribution", s.distribution_policy.clone()),
            ],
            NodeEntity::ManagementEntity(m) => {
                vec![("Registration no.", m.registration_no.clone())]
            }
        };
        std::iter::once(("Id", self.entity_id().to_string()))
            .chain(fields.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))))
            .collect()
    }
}

// =============================================================================
// Nodes & edges
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub color: &'static str,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Unique within one graph.
    pub id: String,
    pub entity: NodeEntity,
    pub position: Position,
    pub style: NodeStyle,
}

impl GraphNode {
    fn new(id: String, entity: NodeEntity, position: Position) -> Self {
        let style = entity.kind().style();
        Self {
            id,
            entity,
            position,
            style,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.entity.kind()
    }

    pub fn label(&self) -> &str {
        self.entity.label()
    }
}

/// Relation carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Manages,
    HasClass,
    Parent,
}

impl Relation {
    pub fn label(&self) -> &'static str {
        match self {
            Relation::Manages => "manages",
            Relation::HasClass => "has class",
            Relation::Parent => "parent",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

/// Nodes and edges of one rendered hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub depth: Depth,
}

impl HierarchyGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The root fund node; always the first one.
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.first()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Node id of a management entity.
pub fn management_node_id(entity: &ManagementEntity) -> String {
    format!("{MANAGEMENT_PREFIX}{}", entity.id)
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    ids: HashSet<String>,
}

impl GraphBuilder {
    /// Place a node unless its id is taken. Returns whether it was placed.
    fn add_node(&mut self, node: GraphNode) -> bool {
        if !self.ids.insert(node.id.clone()) {
            log::warn!(
                "Skipping {} '{}': node id already in graph",
                node.kind().label(),
                node.id
            );
            return false;
        }
        self.nodes.push(node);
        true
    }

    fn add_edge(&mut self, source: &str, target: &str, relation: Relation) {
        self.edges.push(GraphEdge {
            id: format!("{source}->{target}"),
            source: source.to_string(),
            target: target.to_string(),
            relation,
        });
    }

    fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Build the hierarchy graph of `root` from a children fetch.
///
/// Share classes come from `root`, or from `subtree.root` when `root` has
/// none. Subfunds are placed shallowest level first, keeping response order
/// within a level, and hang under their `parent_id` when that node is already
/// placed, under the root otherwise.
pub fn build_hierarchy(root: &Fund, subtree: &Subtree) -> HierarchyGraph {
    let mut builder = GraphBuilder::default();
    let root_id = root.id.clone();

    builder.add_node(GraphNode::new(
        root_id.clone(),
        NodeEntity::Fund(root.clone()),
        Position { x: 0.0, y: 0.0 },
    ));

    if let Some(entity) = &root.management_entity {
        let id = management_node_id(entity);
        let placed = builder.add_node(GraphNode::new(
            id.clone(),
            NodeEntity::ManagementEntity(entity.clone()),
            Position {
                x: MANAGEMENT_OFFSET_X,
                y: 0.0,
            },
        ));
        if placed {
            builder.add_edge(&id, &root_id, Relation::Manages);
        }
    }

    let share_classes = if root.share_classes.is_empty() {
        &subtree.root.share_classes
    } else {
        &root.share_classes
    };
    for (i, class) in share_classes.iter().enumerate() {
        let placed = builder.add_node(GraphNode::new(
            class.id.clone(),
            NodeEntity::ShareClass(class.clone()),
            Position {
                x: SHARE_CLASS_OFFSET_X + SHARE_CLASS_SPACING * i as f64,
                y: SHARE_CLASS_OFFSET_Y,
            },
        ));
        if placed {
            builder.add_edge(&root_id, &class.id, Relation::HasClass);
        }
    }

    let mut children: Vec<&SubFund> = subtree.children.iter().collect();
    children.sort_by_key(|child| level_of(child));

    let mut level_sizes: HashMap<u8, usize> = HashMap::new();
    for child in &children {
        *level_sizes.entry(level_of(child)).or_default() += 1;
    }
    let mut level_index: HashMap<u8, usize> = HashMap::new();

    for child in children {
        let level = level_of(child);
        let n = level_sizes.get(&level).copied().unwrap_or(1);
        let slot = level_index.entry(level).or_default();
        let i = *slot;
        *slot += 1;

        let parent = child
            .parent_id
            .as_deref()
            .filter(|p| *p != child.id && builder.contains(p))
            .unwrap_or(root_id.as_str())
            .to_string();

        let placed = builder.add_node(GraphNode::new(
            child.id.clone(),
            NodeEntity::SubFund(child.clone()),
            Position {
                x: (i as f64 - (n as f64 - 1.0) / 2.0) * SUBFUND_SPACING,
                y: LEVEL_HEIGHT * level as f64,
            },
        ));
        if placed {
            builder.add_edge(&parent, &child.id, Relation::Parent);
        }
    }

    HierarchyGraph {
        nodes: builder.nodes,
        edges: builder.edges,
        depth: subtree.depth,
    }
}

fn level_of(child: &SubFund) -> u8 {
    child.depth.unwrap_or(1).max(1)
}
