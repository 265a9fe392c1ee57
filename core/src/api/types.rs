//! Response envelopes and their normalization.
//!
//! The canonical list envelope is `{ "data": [...], "total": n }`. Older
//! endpoints answer with a bare array or with `{ "funds": [...] }`; both are
//! accepted here and turned into a [`Page`] so nothing past this module ever
//! sees them.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{NormalizeError, NormalizeResult};
use crate::models::{Depth, Fund, FundSummary, ManagementEntity, SubFund, Subtree};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching records server side. Equals `items.len()` when the
    /// server did not report it.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Normalize any accepted list envelope, mapping each item with `item`.
pub fn normalize_page<T>(
    body: &Value,
    item: impl Fn(&Value) -> NormalizeResult<T>,
) -> NormalizeResult<Page<T>> {
    let (items, total) = match body {
        Value::Array(items) => (items, None),
        Value::Object(map) => {
            let items = ["data", "funds"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .ok_or_else(|| {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    NormalizeError::UnexpectedShape(format!(
                        "object without 'data' or 'funds' array (keys: {})",
                        keys.join(", ")
                    ))
                })?;
            let total = map
                .get("total")
                .and_then(Value::as_u64)
                .and_then(|t| usize::try_from(t).ok());
            (items, total)
        }
        other => {
            return Err(NormalizeError::UnexpectedShape(format!(
                "expected array or object, got {}",
                json_kind(other)
            )))
        }
    };

    let items = items
        .iter()
        .filter(|v| !v.is_null())
        .map(item)
        .collect::<NormalizeResult<Vec<_>>>()?;
    let total = total.unwrap_or(items.len());
    Ok(Page { items, total })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Typed decoders, one per endpoint
// =============================================================================

/// `GET /funds/`
pub fn parse_fund_page(body: &Value) -> NormalizeResult<Page<Fund>> {
    normalize_page(body, Fund::from_value)
}

/// `GET /funds/{id}`
pub fn parse_fund(body: &Value) -> NormalizeResult<Fund> {
    Fund::from_value(body)
}

/// `GET /funds/search`
pub fn parse_search_results(body: &Value) -> NormalizeResult<Vec<FundSummary>> {
    normalize_page(body, FundSummary::from_value).map(|page| page.items)
}

/// `GET /funds/{id}/hierarchy/children`
pub fn parse_subtree(body: &Value, requested: Depth) -> NormalizeResult<Subtree> {
    Subtree::from_value(body, requested)
}

/// `GET /funds/{id}/hierarchy?direction=children&levels=`
///
/// Accepts the three shapes this route has been seen to return:
///
/// - one row per reachable subfund, `[{"f": root, "r": [...], "child": subfund}]`,
///   where the length of `r` is the subfund's depth;
/// - a `{nodes, links}` graph, depths measured from `root_id` along the links;
/// - the `{root, children}` body of the children route.
///
/// Subfunds deeper than `requested` are dropped. When the body carries no
/// root record, a bare fund with id `root_id` stands in for it.
pub fn parse_hierarchy(body: &Value, root_id: &str, requested: Depth) -> NormalizeResult<Subtree> {
    let (root, mut children) = match body {
        Value::Array(rows) => hierarchy_rows(rows, root_id)?,
        Value::Object(map) if map.contains_key("nodes") => hierarchy_graph(map, root_id)?,
        Value::Object(map) if map.contains_key("root") => {
            return Subtree::from_value(body, requested)
        }
        other => {
            return Err(NormalizeError::UnexpectedShape(format!(
                "hierarchy as {}",
                json_kind(other)
            )))
        }
    };

    children.retain(|child| child.depth.map_or(true, |d| d <= requested.get()));
    let root = match root {
        Some(root) => root,
        None => Fund::from_value(&json!({ "fund_id": root_id }))?,
    };
    Ok(Subtree {
        root,
        children,
        depth: requested,
    })
}

fn hierarchy_rows(rows: &[Value], root_id: &str) -> NormalizeResult<(Option<Fund>, Vec<SubFund>)> {
    let mut root = None;
    let mut children = Vec::new();

    for row in rows.iter().filter(|row| !row.is_null()) {
        if root.is_none() {
            if let Some(f) = row.get("f").filter(|f| f.is_object()) {
                root = Some(Fund::from_value(f)?);
            }
        }
        let Some(child) = row.get("child").filter(|c| c.is_object()) else {
            continue;
        };
        let mut subfund = SubFund::from_value(child)?;
        if subfund.depth.is_none() {
            let hops = row.get("r").and_then(Value::as_array).map_or(1, Vec::len);
            subfund.depth = Some(u8::try_from(hops).unwrap_or(u8::MAX).max(1));
        }
        if subfund.parent_id.is_none() && subfund.depth == Some(1) {
            subfund.parent_id = Some(root_id.to_string());
        }
        children.push(subfund);
    }

    Ok((root, children))
}

fn hierarchy_graph(
    map: &Map<String, Value>,
    root_id: &str,
) -> NormalizeResult<(Option<Fund>, Vec<SubFund>)> {
    let nodes = map
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| NormalizeError::UnexpectedShape("'nodes' is not an array".into()))?;
    let links: Vec<(String, String)> = map
        .get("links")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|link| Some((link_end(link.get("source")?)?, link_end(link.get("target")?)?)))
        .collect();

    // Breadth-first from the root; the first link reaching a node is its parent.
    let mut placed: HashMap<String, (u8, String)> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::from([root_id.to_string()]);
    let mut frontier = vec![root_id.to_string()];
    let mut level = 0u8;
    while !frontier.is_empty() && level < u8::MAX {
        level += 1;
        let mut next = Vec::new();
        for (source, target) in &links {
            if frontier.contains(source) && seen.insert(target.clone()) {
                placed.insert(target.clone(), (level, source.clone()));
                next.push(target.clone());
            }
        }
        frontier = next;
    }

    let mut root = None;
    let mut children = Vec::new();
    for node in nodes.iter().filter(|n| n.is_object()) {
        let Some(id) = link_end(node) else {
            continue;
        };
        if id == root_id {
            root = Some(Fund::from_value(node)?);
            continue;
        }
        let is_fund = node
            .get("type")
            .and_then(Value::as_str)
            .map_or(true, |kind| kind.to_ascii_lowercase().contains("fund"));
        let Some((depth, parent)) = placed.get(&id).filter(|_| is_fund) else {
            continue;
        };
        let mut subfund = SubFund::from_value(node)?;
        subfund.depth = Some(*depth);
        subfund.parent_id.get_or_insert_with(|| parent.clone());
        children.push(subfund);
    }

    Ok((root, children))
}

/// Id of a link end: a bare id, or an object carrying one.
fn link_end(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => ["id", "fund_id", "subfund_id"]
            .iter()
            .find_map(|key| obj.get(*key))
            .and_then(link_end),
        _ => None,
    }
}

/// `GET /funds/managed-by/{mgmt_id}`
pub fn parse_managed_funds(body: &Value) -> NormalizeResult<Page<Fund>> {
    normalize_page(body, Fund::from_value)
}

/// `GET /management/`
pub fn parse_management_entities(body: &Value) -> NormalizeResult<Page<ManagementEntity>> {
    normalize_page(body, ManagementEntity::from_value)
}

// =============================================================================
// Ingestion
// =============================================================================

/// Body of a successful `POST /ingest/upload`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IngestReceipt {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

// =============================================================================
// Error bodies
// =============================================================================

/// Message to attach to a non-success response.
///
/// Error bodies look like `{"detail": "..."}`. A detail that is not a string
/// (validation errors come back as arrays) is rendered as compact JSON. A
/// body that is not JSON is used as-is when it is not blank.
pub fn error_detail(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        },
        Err(_) => {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_envelope() {
        let page = parse_fund_page(&json!({
            "data": [{"fund_id": "F1"}, {"fund_id": "F2"}],
            "total": 42
        }))
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 42);
    }

    #[test]
    fn test_bare_array_envelope() {
        let page = parse_fund_page(&json!([{"id": "F1"}, {"id": "F2"}, {"id": "F3"}])).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[2].id, "F3");
    }

    #[test]
    fn test_funds_envelope_without_total() {
        let page = parse_managed_funds(&json!({"funds": [{"fund_id": "F9"}]})).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "F9");
    }

    #[test]
    fn test_empty_managed_funds() {
        let page = parse_managed_funds(&json!([])).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_unexpected_shapes() {
        let err = parse_fund_page(&json!({"items": []})).unwrap_err();
        assert!(matches!(err, NormalizeError::UnexpectedShape(ref msg) if msg.contains("items")));

        let err = parse_fund_page(&json!("nope")).unwrap_err();
        assert!(matches!(err, NormalizeError::UnexpectedShape(ref msg) if msg.contains("string")));
    }

    #[test]
    fn test_total_outside_usize_falls_back_to_len() {
        let page = parse_fund_page(&json!({"data": [{"fund_id": "F1"}], "total": -3})).unwrap();
        assert_eq!(page.total, 1);

        let page = parse_fund_page(&json!({"data": [], "total": 7})).unwrap();
        assert_eq!(page.total, 7);
    }

    #[test]
    fn test_hierarchy_rows() {
        let subtree = parse_hierarchy(
            &json!([
                {"f": {"id": "F1", "name": "Alpha"}, "r": [{}], "child": {"id": "S1"}},
                {"f": {"id": "F1"}, "r": [{}, {}], "child": {"id": "S2", "parent_fund_id": "S1"}},
                {"f": {"id": "F1"}, "r": [{}, {}, {}], "child": {"id": "S3"}}
            ]),
            "F1",
            Depth::try_from(2).unwrap(),
        )
        .unwrap();

        assert_eq!(subtree.root.label(), "Alpha");
        assert_eq!(subtree.children.len(), 2);
        assert_eq!(subtree.children[0].depth, Some(1));
        assert_eq!(subtree.children[0].parent_id.as_deref(), Some("F1"));
        assert_eq!(subtree.children[1].depth, Some(2));
        assert_eq!(subtree.children[1].parent_id.as_deref(), Some("S1"));
    }

    #[test]
    fn test_hierarchy_rows_empty_keeps_root_id() {
        let subtree = parse_hierarchy(&json!([]), "F7", Depth::default()).unwrap();
        assert_eq!(subtree.root.id, "F7");
        assert!(subtree.children.is_empty());
    }

    #[test]
    fn test_hierarchy_nodes_and_links() {
        let subtree = parse_hierarchy(
            &json!({
                "nodes": [
                    {"id": "F1", "name": "Alpha", "type": "Fund"},
                    {"id": "S1", "type": "SubFund"},
                    {"id": "S2", "type": "SubFund"},
                    {"id": "SC1", "type": "ShareClass"},
                    {"id": "orphan", "type": "SubFund"}
                ],
                "links": [
                    {"source": "F1", "target": "S1"},
                    {"source": {"id": "S1"}, "target": {"id": "S2"}},
                    {"source": "F1", "target": "SC1"}
                ]
            }),
            "F1",
            Depth::MAX,
        )
        .unwrap();

        assert_eq!(subtree.root.label(), "Alpha");
        let ids: Vec<&str> = subtree.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
        assert_eq!(subtree.children[1].depth, Some(2));
        assert_eq!(subtree.children[1].parent_id.as_deref(), Some("S1"));
    }

    #[test]
    fn test_hierarchy_accepts_children_body() {
        let subtree = parse_hierarchy(
            &json!({"root": {"fund_id": "F1"}, "children": [{"subfund_id": "S1", "depth": 1}]}),
            "F1",
            Depth::default(),
        )
        .unwrap();
        assert_eq!(subtree.children.len(), 1);

        let err = parse_hierarchy(&json!("F1"), "F1", Depth::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::UnexpectedShape(_)));
    }

    #[test]
    fn test_search_results() {
        let hits = parse_search_results(&json!([
            {"id": "F1", "name": "Alpha"},
            {"id": 2, "name": null}
        ]))
        .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].label(), "Alpha");
        assert_eq!(hits[1].label(), "2");
    }

    #[test]
    fn test_management_entities() {
        let page = parse_management_entities(&json!([
            {"mgmt_id": "M1", "registration_no": "R1"},
            {"id": "M2"}
        ]))
        .unwrap();
        assert_eq!(page.items[1].id, "M2");
        assert_eq!(page.items[0].registration_no.as_deref(), Some("R1"));
    }

    #[test]
    fn test_ingest_receipt() {
        let receipt: IngestReceipt =
            serde_json::from_value(json!({"detail": "Ingested", "target": "subfunds"})).unwrap();
        assert_eq!(receipt.target.as_deref(), Some("subfunds"));

        let empty: IngestReceipt = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, IngestReceipt::default());
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "Fund not found"}"#).as_deref(),
            Some("Fund not found")
        );
        assert_eq!(
            error_detail(r#"{"detail": [{"loc": ["query"]}]}"#).as_deref(),
            Some(r#"[{"loc":["query"]}]"#)
        );
        assert_eq!(error_detail(r#"{"message": "x"}"#), None);
        assert_eq!(error_detail("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_detail("   "), None);
    }
}
