//! Paged fund list and management entity directory.

use std::num::NonZeroUsize;

use fundref::{
    ApiResult, Fund, ManagementEntity, PageLink, Pagination, RequestTracker, FUND_PAGE_SIZE,
    MANAGEMENT_LIST_LIMIT,
};
use leptos::*;

use super::fund_detail::FundDetailModal;
use super::managed_funds::ManagedFundsModal;
use super::notice::NoticeBanner;
use super::pagination::PaginationControl;
use crate::services::use_api_client;
use crate::types::Notice;

const DETAIL_ERROR: &str = "Could not fetch fund details";

/// Secondary hint of a list row: `type · management id`.
pub fn fund_hint(fund: &Fund) -> String {
    format!(
        "{} · {}",
        fund.fund_type.as_deref().unwrap_or("—"),
        fund.management_id().unwrap_or("—")
    )
}

/// Outcome of a detail fetch: the fund to open in a modal, or the notice to
/// show instead. The list itself is never part of the outcome.
pub fn detail_outcome(result: ApiResult<Fund>) -> (Option<Fund>, Option<Notice>) {
    match result {
        Ok(fund) => (Some(fund), None),
        Err(err) => {
            log::error!("Could not fetch fund details: {}", err);
            (None, Some(Notice::error(DETAIL_ERROR)))
        }
    }
}

fn page_size() -> NonZeroUsize {
    NonZeroUsize::new(FUND_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN)
}

// =============================================================================
// Fund list
// =============================================================================

#[component]
pub fn FundListPage() -> impl IntoView {
    let client = store_value(use_api_client());
    let list_tracker = RequestTracker::new();
    let detail_tracker = RequestTracker::new();
    {
        let list_tracker = list_tracker.clone();
        let detail_tracker = detail_tracker.clone();
        on_cleanup(move || {
            list_tracker.cancel();
            detail_tracker.cancel();
        });
    }
    let list_tracker = store_value(list_tracker);
    let detail_tracker = store_value(detail_tracker);

    let (funds, set_funds) = create_signal(Vec::<Fund>::new());
    let (pagination, set_pagination) = create_signal(Pagination::new(0, page_size(), 1));
    let (loading, set_loading) = create_signal(false);
    let (notice, set_notice) = create_signal(None::<Notice>);
    let (detail, set_detail) = create_signal(None::<Fund>);

    let load_page = move |link: PageLink| {
        let client = client.get_value();
        let tracker = list_tracker.get_value();
        let token = tracker.begin();
        set_loading.set(true);

        spawn_local(async move {
            let result = client.list_funds(link.offset, FUND_PAGE_SIZE).await;
            if !tracker.is_current(token) {
                log::debug!("Discarding stale fund page {}", link.number);
                return;
            }
            set_loading.set(false);
            match result {
                Ok(page) => {
                    log::info!("Loaded fund page {} ({} of {})", link.number, page.items.len(), page.total);
                    set_pagination.set(Pagination::new(page.total, page_size(), link.number));
                    set_funds.set(page.items);
                }
                Err(err) => {
                    log::error!("Could not fetch fund page {}: {}", link.number, err);
                    set_notice.set(Some(Notice::error(err.user_message())));
                }
            }
        });
    };

    load_page(PageLink {
        number: 1,
        offset: 0,
        active: true,
    });

    // The list is left untouched whatever the outcome.
    let open_detail = move |id: String| {
        let client = client.get_value();
        let tracker = detail_tracker.get_value();
        let token = tracker.begin();
        set_notice.set(None);

        spawn_local(async move {
            let result = client.fund(&id).await;
            if !tracker.is_current(token) {
                log::debug!("Discarding stale details of {}", id);
                return;
            }
            let (fund, notice) = detail_outcome(result);
            set_detail.set(fund);
            set_notice.set(notice);
        });
    };

    view! {
        <div class="funds-page">
            <section class="fund-list-section">
                <h1>"Funds"</h1>
                <NoticeBanner notice=notice/>
                <Show when=move || loading.get()>
                    <p class="loading">"Loading…"</p>
                </Show>
                <ul class="fund-list">
                    <For
                        each=move || funds.get()
                        key=|fund| fund.id.clone()
                        children=move |fund| {
                            let id = fund.id.clone();
                            view! {
                                <li class="fund-row clickable" on:click=move |_| open_detail(id.clone())>
                                    <span class="fund-name">{fund.label().to_string()}</span>
                                    <span class="fund-id">{fund.id.clone()}</span>
                                    <span class="fund-hint">{fund_hint(&fund)}</span>
                                </li>
                            }
                        }
                    />
                </ul>
                <PaginationControl pagination=pagination on_select=load_page/>
            </section>

            <ManagementList/>

            {move || {
                detail
                    .get()
                    .map(|fund| {
                        view! { <FundDetailModal fund=fund on_close=move |_: ()| set_detail.set(None)/> }
                    })
            }}
        </div>
    }
}

// =============================================================================
// Management entities
// =============================================================================

/// Directory of management entities; clicking one lists its funds.
#[component]
pub fn ManagementList() -> impl IntoView {
    let client = use_api_client();
    let tracker = RequestTracker::new();
    {
        let tracker = tracker.clone();
        on_cleanup(move || tracker.cancel());
    }

    let (entities, set_entities) = create_signal(Vec::<ManagementEntity>::new());
    let (notice, set_notice) = create_signal(None::<Notice>);
    let (selected, set_selected) = create_signal(None::<ManagementEntity>);

    let token = tracker.begin();
    spawn_local(async move {
        let result = client.management_entities(0, MANAGEMENT_LIST_LIMIT).await;
        if !tracker.is_current(token) {
            return;
        }
        match result {
            Ok(page) => {
                log::info!("Loaded {} management entities", page.items.len());
                set_entities.set(page.items);
            }
            Err(err) => {
                log::error!("Could not fetch management entities: {}", err);
                set_notice.set(Some(Notice::error(err.user_message())));
            }
        }
    });

    view! {
        <section class="management-section">
            <h2>"Management entities"</h2>
            <NoticeBanner notice=notice/>
            <ul class="entity-list">
                <For
                    each=move || entities.get()
                    key=|entity| entity.id.clone()
                    children=move |entity| {
                        let label = entity.label().to_string();
                        let id = entity.id.clone();
                        view! {
                            <li class="entity-row clickable" on:click=move |_| set_selected.set(Some(entity.clone()))>
                                <span class="entity-name">{label}</span>
                                <span class="entity-id">{id}</span>
                            </li>
                        }
                    }
                />
            </ul>
            {move || {
                selected
                    .get()
                    .map(|entity| {
                        view! { <ManagedFundsModal entity=entity on_close=move |_: ()| set_selected.set(None)/> }
                    })
            }}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoticeLevel;
    use fundref::ApiError;
    use serde_json::json;

    #[test]
    fn test_fund_hint_with_management_entity() {
        let fund = Fund::from_value(&json!({
            "fund_id": "F1",
            "fund_type": "SICAV",
            "management_entity": {"mgmt_id": "M9"}
        }))
        .unwrap();
        assert_eq!(fund_hint(&fund), "SICAV · M9");
    }

    #[test]
    fn test_fund_hint_placeholders() {
        let fund = Fund::from_value(&json!({"id": "F2"})).unwrap();
        assert_eq!(fund_hint(&fund), "— · —");
    }

    #[test]
    fn test_failed_detail_opens_no_modal() {
        let (fund, notice) = detail_outcome(Err(ApiError::Status {
            status: 404,
            detail: Some("Fund not found".into()),
        }));
        assert!(fund.is_none());
        let notice = notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Could not fetch fund details");
    }

    #[test]
    fn test_detail_opens_modal() {
        let fetched = Fund::from_value(&json!({"fund_id": "F1"})).unwrap();
        let (fund, notice) = detail_outcome(Ok(fetched.clone()));
        assert_eq!(fund, Some(fetched));
        assert!(notice.is_none());
    }

    #[test]
    fn test_page_size_matches_config() {
        assert_eq!(page_size().get(), FUND_PAGE_SIZE);
    }
}
