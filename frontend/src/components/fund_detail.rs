//! Detailed view of a single fund.

use fundref::Fund;
use leptos::*;
use leptos_router::A;
use serde_json::Value;

use super::modal::Modal;
use crate::types::status_badge_class;
use crate::visualization_path;

/// Nested sections dumped as JSON, with their headings.
const SECTIONS: [(&str, &str); 4] = [
    ("management_entity", "Management entity"),
    ("legal_entity", "Legal entity"),
    ("share_classes", "Share classes"),
    ("subfunds", "Subfunds"),
];

/// Pretty-printed JSON, `null` for a missing section.
pub fn json_dump(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[component]
pub fn FundDetailModal(fund: Fund, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let title = fund.label().to_string();
    let graph_href = visualization_path(&fund.id);
    let badge = status_badge_class(fund.status.as_deref());

    let sections = SECTIONS
        .iter()
        .map(|(key, heading)| {
            let dump = json_dump(fund.raw_section(key));
            view! {
                <div class="detail-section">
                    <h3>{*heading}</h3>
                    <pre class="json-dump">{dump}</pre>
                </div>
            }
        })
        .collect_view();

    view! {
        <Modal title=title on_close=on_close>
            <div class="detail-fields">
                <div class="detail-field">
                    <span class="detail-label">"Id"</span>
                    <span class="detail-value">{fund.id.clone()}</span>
                </div>
                <div class="detail-field">
                    <span class="detail-label">"Type"</span>
                    <span class="detail-value">{fund.fund_type.clone().unwrap_or_else(|| "—".into())}</span>
                </div>
                <div class="detail-field">
                    <span class="detail-label">"Status"</span>
                    <span class=badge>{fund.status.clone().unwrap_or_else(|| "Unknown".into())}</span>
                </div>
            </div>
            {sections}
            <A href=graph_href class="button">"Open hierarchy graph"</A>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_section_dumps_null() {
        let fund = Fund::from_value(&json!({"fund_id": "F1"})).unwrap();
        assert_eq!(json_dump(fund.raw_section("legal_entity")), "null");
    }

    #[test]
    fn test_section_dump_is_pretty() {
        let fund = Fund::from_value(&json!({
            "fund_id": "F1",
            "management_entity": {"mgmt_id": "M1"}
        }))
        .unwrap();
        assert_eq!(
            json_dump(fund.raw_section("management_entity")),
            "{\n  \"mgmt_id\": \"M1\"\n}"
        );
    }
}
