//! Domain models for the fund referential.
//!
//! The external API does not commit to one field naming scheme (`fund_id`
//! or `id`, `mgmt_id` or `id`, ...). Every record is therefore built through
//! an explicit `from_value` step that resolves the accepted aliases once and
//! fails on a missing identifier instead of cascading through fallbacks at
//! render time.
//!
//! - [`Fund`] - Top-level investment vehicle with its nested relations
//! - [`ManagementEntity`] - Administrating organization
//! - [`LegalEntity`] - Legal wrapper of a fund
//! - [`ShareClass`] - Currency/distribution variant of a fund
//! - [`SubFund`] - Child vehicle, possibly several levels deep
//! - [`FundSummary`] - Search hit
//! - [`Subtree`] / [`Depth`] - Result of a depth-bounded children fetch

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DepthError, NormalizeError, NormalizeResult};

// =============================================================================
// Raw record access
// =============================================================================

/// Read-only view over one JSON object of the external payload.
struct Record<'a> {
    entity: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    fn new(entity: &'static str, value: &'a Value) -> NormalizeResult<Self> {
        value
            .as_object()
            .map(|fields| Self { entity, fields })
            .ok_or(NormalizeError::NotAnObject { entity })
    }

    /// First alias holding a non-empty string or a number.
    fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(scalar_text))
    }

    fn required(&self, field: &'static str, aliases: &[&str]) -> NormalizeResult<String> {
        self.text(aliases).ok_or(NormalizeError::MissingField {
            entity: self.entity,
            field,
        })
    }

    /// Nested object, `None` when absent or null.
    fn nested(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| v.is_object())
    }

    /// Items of a nested array, nulls dropped.
    fn list(&self, key: &str) -> impl Iterator<Item = &'a Value> {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|v| !v.is_null())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// Management Entity
// =============================================================================

/// Organization administrating one or more funds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementEntity {
    pub id: String,
    pub registration_no: Option<String>,
    pub name: Option<String>,
}

impl ManagementEntity {
    /// Build from an API payload. Accepts `mgmt_id` or `id`.
    pub fn from_value(value: &Value) -> NormalizeResult<Self> {
        let record = Record::new("ManagementEntity", value)?;
        Ok(Self {
            id: record.required("mgmt_id", &["mgmt_id", "id"])?,
            registration_no: record.text(&["registration_no", "registration_number"]),
            name: record.text(&["name", "mgmt_name"]),
        })
    }

    /// Display label: name, then registration number, then id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.registration_no.as_deref())
            .unwrap_or(&self.id)
    }
}

// =============================================================================
// Legal Entity
// =============================================================================

/// Legal wrapper of a fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub id: String,
    pub name: Option<String>,
}

impl LegalEntity {
    pub fn from_value(value: &Value) -> NormalizeResult<Self> {
        let record = Record::new("LegalEntity", value)?;
        Ok(Self {
            id: record.required("legal_entity_id", &["legal_entity_id", "le_id", "id"])?,
            name: record.text(&["name", "legal_name"]),
        })
    }
}

// =============================================================================
// Share Class
// =============================================================================

/// Currency/distribution variant of a fund offered to investors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareClass {
    pub id: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub distribution_policy: Option<String>,
}

impl ShareClass {
    pub fn from_value(value: &Value) -> NormalizeResult<Self> {
        let record = Record::new("ShareClass", value)?;
        Ok(Self {
            id: record.required("share_class_id", &["share_class_id", "isin", "id"])?,
            name: record.text(&["share_class_name", "name"]),
            currency: record.text(&["currency"]),
            distribution_policy: record.text(&["distribution_policy", "dist_policy"]),
        })
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

// =============================================================================
// Sub Fund
// =============================================================================

/// Child investment vehicle under a fund (or under another subfund).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubFund {
    pub id: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    /// Fund or subfund this one hangs under, when the API says so.
    pub parent_id: Option<String>,
    /// Distance from the root, as reported by the children fetch.
    pub depth: Option<u8>,
}

impl SubFund {
    pub fn from_value(value: &Value) -> NormalizeResult<Self> {
        let record = Record::new("SubFund", value)?;
        Ok(Self {
            id: record.required("subfund_id", &["subfund_id", "id"])?,
            name: record.text(&["subfund_name", "fund_name", "name"]),
            currency: record.text(&["currency"]),
            parent_id: record.text(&["parent_fund_id", "master_fund_id"]),
            depth: value
                .get("depth")
                .and_then(Value::as_u64)
                .and_then(|d| u8::try_from(d).ok()),
        })
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

// =============================================================================
// Fund
// =============================================================================

/// Top-level investment vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fund {
    pub id: String,
    pub name: Option<String>,
    pub code: Option<String>,
    pub fund_type: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub domicile: Option<String>,
    pub management_entity: Option<ManagementEntity>,
    pub legal_entity: Option<LegalEntity>,
    pub share_classes: Vec<ShareClass>,
    pub subfunds: Vec<SubFund>,
    /// Payload as received, kept for the generic detail dump.
    #[serde(skip)]
    pub raw: Value,
}

impl Fund {
    /// Build from an API payload.
    ///
    /// The fund id is read from `fund_id`, then `id`. Nested records are
    /// normalized too; one bad child fails the whole fund.
    pub fn from_value(value: &Value) -> NormalizeResult<Self> {
        let record = Record::new("Fund", value)?;

        let management_entity = record
            .nested("management_entity")
            .map(ManagementEntity::from_value)
            .transpose()?;
        let legal_entity = record
            .nested("legal_entity")
            .map(LegalEntity::from_value)
            .transpose()?;
        let share_classes = record
            .list("share_classes")
            .map(ShareClass::from_value)
            .collect::<NormalizeResult<Vec<_>>>()?;
        let subfunds = record
            .list("subfunds")
            .map(SubFund::from_value)
            .collect::<NormalizeResult<Vec<_>>>()?;

        Ok(Self {
            id: record.required("fund_id", &["fund_id", "id"])?,
            name: record.text(&["fund_name", "name"]),
            code: record.text(&["fund_code", "code"]),
            fund_type: record.text(&["fund_type", "type"]),
            status: record.text(&["status"]),
            currency: record.text(&["currency", "base_currency"]),
            domicile: record.text(&["domicile"]),
            management_entity,
            legal_entity,
            share_classes,
            subfunds,
            raw: value.clone(),
        })
    }

    /// Primary label: first non-empty of name, code, id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or(&self.id)
    }

    /// Id of the administrating entity, if any.
    pub fn management_id(&self) -> Option<&str> {
        self.management_entity.as_ref().map(|m| m.id.as_str())
    }

    /// Raw JSON of one nested section (`management_entity`, `share_classes`,
    /// ...), `Null` when the payload had none.
    pub fn raw_section(&self, key: &str) -> &Value {
        self.raw.get(key).unwrap_or(&Value::Null)
    }
}

// =============================================================================
// Search hit
// =============================================================================

/// `{id, name}` record returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundSummary {
    pub id: String,
    pub name: Option<String>,
}

impl FundSummary {
    pub fn from_value(value: &Value) -> NormalizeResult<Self> {
        let record = Record::new("FundSummary", value)?;
        Ok(Self {
            id: record.required("id", &["id", "fund_id"])?,
            name: record.text(&["name", "fund_name", "fund_code"]),
        })
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

// =============================================================================
// Depth & Subtree
// =============================================================================

/// How many subfund levels the children fetch walks, `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Depth(u8);

impl Depth {
    pub const MIN: Depth = Depth(1);
    pub const MAX: Depth = Depth(3);
    /// Every selectable depth, shallowest first.
    pub const ALL: [Depth; 3] = [Depth(1), Depth(2), Depth(3)];

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<i64> for Depth {
    type Error = DepthError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1..=3 => Ok(Depth(value as u8)),
            _ => Err(DepthError(value)),
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of `GET /funds/{id}/hierarchy/children?depth=`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    pub root: Fund,
    pub children: Vec<SubFund>,
    pub depth: Depth,
}

impl Subtree {
    /// Build from `{root, children, depth}`. When the server omits `depth`
    /// the requested one is kept.
    pub fn from_value(value: &Value, requested: Depth) -> NormalizeResult<Self> {
        let record = Record::new("Subtree", value)?;
        let root = record
            .fields
            .get("root")
            .ok_or(NormalizeError::MissingField {
                entity: "Subtree",
                field: "root",
            })
            .and_then(Fund::from_value)?;
        let children = record
            .list("children")
            .map(SubFund::from_value)
            .collect::<NormalizeResult<Vec<_>>>()?;
        let depth = match value.get("depth").and_then(Value::as_i64) {
            Some(d) => Depth::try_from(d)?,
            None => requested,
        };

        Ok(Self {
            root,
            children,
            depth,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fund_aliases_resolved() {
        let fund = Fund::from_value(&json!({
            "fund_id": "F001",
            "fund_code": "ALPHA",
            "fund_type": "UCITS",
            "status": "ACTIVE",
            "management_entity": {"mgmt_id": "M01", "registration_no": "RCS-42"},
            "legal_entity": {"id": "LE9", "name": "Alpha SICAV"},
            "share_classes": [{"isin": "LU0000000001", "currency": "EUR", "distribution_policy": "ACC"}],
            "subfunds": [{"subfund_id": 17, "currency": "USD"}]
        }))
        .unwrap();

        assert_eq!(fund.id, "F001");
        assert_eq!(fund.label(), "ALPHA");
        assert_eq!(fund.management_id(), Some("M01"));
        assert_eq!(fund.legal_entity.as_ref().unwrap().id, "LE9");
        assert_eq!(fund.share_classes[0].id, "LU0000000001");
        assert_eq!(fund.share_classes[0].distribution_policy.as_deref(), Some("ACC"));
        assert_eq!(fund.subfunds[0].id, "17");
        assert_eq!(fund.raw_section("management_entity")["mgmt_id"], "M01");
        assert!(fund.raw_section("nothing").is_null());
    }

    #[test]
    fn test_fund_label_falls_through_blank_name() {
        let fund = Fund::from_value(&json!({"id": "F2", "fund_name": "  "})).unwrap();
        assert_eq!(fund.label(), "F2");

        let named = Fund::from_value(&json!({"id": "F3", "fund_name": "Gamma", "fund_code": "G"}))
            .unwrap();
        assert_eq!(named.label(), "Gamma");
    }

    #[test]
    fn test_missing_fund_id_fails() {
        let err = Fund::from_value(&json!({"fund_name": "Nameless"})).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MissingField {
                entity: "Fund",
                field: "fund_id"
            }
        );
    }

    #[test]
    fn test_bad_child_fails_whole_fund() {
        let err = Fund::from_value(&json!({
            "fund_id": "F1",
            "share_classes": [{"currency": "EUR"}]
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingField { entity: "ShareClass", .. }
        ));
    }

    #[test]
    fn test_null_relations_are_absent() {
        let fund = Fund::from_value(&json!({
            "fund_id": "F1",
            "management_entity": null,
            "legal_entity": null,
            "share_classes": [null],
        }))
        .unwrap();
        assert!(fund.management_entity.is_none());
        assert!(fund.legal_entity.is_none());
        assert!(fund.share_classes.is_empty());
        assert!(fund.subfunds.is_empty());
    }

    #[test]
    fn test_not_an_object() {
        let err = Fund::from_value(&json!(["F1"])).unwrap_err();
        assert_eq!(err, NormalizeError::NotAnObject { entity: "Fund" });
    }

    #[test]
    fn test_management_entity_label() {
        let m = ManagementEntity::from_value(&json!({"id": 5, "registration_no": "B123"})).unwrap();
        assert_eq!(m.id, "5");
        assert_eq!(m.label(), "B123");
    }

    #[test]
    fn test_depth_range() {
        assert_eq!(Depth::try_from(2).unwrap().get(), 2);
        assert_eq!(Depth::try_from(0), Err(DepthError(0)));
        assert_eq!(Depth::try_from(4), Err(DepthError(4)));
        assert_eq!(Depth::default(), Depth::MIN);
        assert_eq!(Depth::ALL.len(), 3);
    }

    #[test]
    fn test_subtree_from_children_payload() {
        let subtree = Subtree::from_value(
            &json!({
                "root": {"fund_id": "F1", "share_classes": [{"id": "SC1"}]},
                "children": [
                    {"subfund_id": "S1", "depth": 1},
                    {"subfund_id": "S2", "depth": 2, "parent_fund_id": "S1"}
                ],
                "depth": 2
            }),
            Depth::MIN,
        )
        .unwrap();

        assert_eq!(subtree.root.id, "F1");
        assert_eq!(subtree.children.len(), 2);
        assert_eq!(subtree.children[1].parent_id.as_deref(), Some("S1"));
        assert_eq!(subtree.children[1].depth, Some(2));
        assert_eq!(subtree.depth.get(), 2);
    }

    #[test]
    fn test_subtree_keeps_requested_depth() {
        let requested = Depth::try_from(3).unwrap();
        let subtree = Subtree::from_value(&json!({"root": {"id": "F1"}}), requested).unwrap();
        assert_eq!(subtree.depth, requested);
        assert!(subtree.children.is_empty());
    }

    #[test]
    fn test_subtree_without_root_fails() {
        let err = Subtree::from_value(&json!({"children": []}), Depth::MIN).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField { field: "root", .. }));
    }
}
