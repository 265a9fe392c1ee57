//! Funds administered by one management entity.

use fundref::{ApiResult, Fund, ManagementEntity, Page, RequestTracker};
use leptos::*;
use leptos_router::use_navigate;

use super::modal::Modal;
use crate::services::use_api_client;
use crate::types::status_badge_class;
use crate::visualization_path;

/// Secondary line of a fund row: code, type, currency and domicile, skipping
/// whatever is missing.
pub fn fund_meta(fund: &Fund) -> String {
    [&fund.code, &fund.fund_type, &fund.currency, &fund.domicile]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Funds to list after a fetch. A failure lists nothing.
pub fn managed_funds_outcome(mgmt_id: &str, result: ApiResult<Page<Fund>>) -> Vec<Fund> {
    match result {
        Ok(page) => {
            log::info!("{} manages {} funds", mgmt_id, page.items.len());
            page.items
        }
        Err(err) => {
            log::warn!("Could not fetch funds managed by {}: {}", mgmt_id, err);
            Vec::new()
        }
    }
}

/// Placeholder shown instead of the list, if any.
pub fn managed_funds_placeholder(loading: bool, funds: &[Fund]) -> Option<&'static str> {
    if loading {
        Some("Loading funds…")
    } else if funds.is_empty() {
        Some("No funds found")
    } else {
        None
    }
}

/// Lists the first page of funds managed by `entity`. A failed fetch shows
/// the same empty state as an entity without funds.
#[component]
pub fn ManagedFundsModal(
    entity: ManagementEntity,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let client = use_api_client();
    let tracker = RequestTracker::new();
    {
        let tracker = tracker.clone();
        on_cleanup(move || tracker.cancel());
    }

    let (funds, set_funds) = create_signal(Vec::<Fund>::new());
    let (loading, set_loading) = create_signal(true);

    let mgmt_id = entity.id.clone();
    let token = tracker.begin();
    spawn_local(async move {
        let result = client.managed_funds(&mgmt_id).await;
        if !tracker.is_current(token) {
            log::debug!("Discarding managed funds of {}", mgmt_id);
            return;
        }
        set_funds.set(managed_funds_outcome(&mgmt_id, result));
        set_loading.set(false);
    });

    let navigate = use_navigate();
    let view_fund = move |id: String| {
        on_close.call(());
        navigate(&visualization_path(&id), Default::default());
    };

    let title = format!("Funds managed by {}", entity.label());

    view! {
        <Modal title=title on_close=on_close>
            {move || {
                let loading = loading.get();
                if let Some(text) = funds.with(|f| managed_funds_placeholder(loading, f)) {
                    let class = if loading { "loading" } else { "empty-state" };
                    return view! { <p class=class>{text}</p> }.into_view();
                }
                let view_fund = view_fund.clone();
                view! {
                    <ul class="fund-list">
                        {funds
                            .get()
                            .into_iter()
                            .map(|fund| {
                                let view_fund = view_fund.clone();
                                let id = fund.id.clone();
                                view! {
                                    <li class="fund-row">
                                        <div class="fund-row-main">
                                            <span class="fund-name">{fund.label().to_string()}</span>
                                            <span class=status_badge_class(fund.status.as_deref())>
                                                {fund.status.clone().unwrap_or_else(|| "Unknown".into())}
                                            </span>
                                        </div>
                                        <div class="fund-row-meta">{fund_meta(&fund)}</div>
                                        <button class="button-small" on:click=move |_| view_fund(id.clone())>
                                            "View"
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_view()
            }}
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundref::ApiError;
    use serde_json::json;

    #[test]
    fn test_failed_fetch_shows_no_funds_found() {
        let funds = managed_funds_outcome("M1", Err(ApiError::Network("offline".into())));
        assert!(funds.is_empty());
        assert_eq!(managed_funds_placeholder(false, &funds), Some("No funds found"));
    }

    #[test]
    fn test_placeholder_while_loading_and_with_funds() {
        assert_eq!(managed_funds_placeholder(true, &[]), Some("Loading funds…"));

        let page = Page {
            items: vec![Fund::from_value(&json!({"fund_id": "F1"})).unwrap()],
            total: 1,
        };
        let funds = managed_funds_outcome("M1", Ok(page));
        assert_eq!(funds.len(), 1);
        assert_eq!(managed_funds_placeholder(false, &funds), None);
    }

    #[test]
    fn test_fund_meta_joins_present_fields() {
        let fund = Fund::from_value(&json!({
            "fund_id": "F1",
            "fund_code": "ALP",
            "fund_type": "UCITS",
            "currency": "EUR",
            "domicile": "LU"
        }))
        .unwrap();
        assert_eq!(fund_meta(&fund), "ALP · UCITS · EUR · LU");
    }

    #[test]
    fn test_fund_meta_skips_missing_fields() {
        let fund = Fund::from_value(&json!({"fund_id": "F1", "currency": "USD"})).unwrap();
        assert_eq!(fund_meta(&fund), "USD");

        let bare = Fund::from_value(&json!({"fund_id": "F2"})).unwrap();
        assert_eq!(fund_meta(&bare), "");
    }
}
