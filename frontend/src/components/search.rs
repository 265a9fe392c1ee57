//! Free-text fund search.

use fundref::{FundSummary, RequestTracker};
use leptos::*;
use leptos_router::use_navigate;

use super::notice::NoticeBanner;
use crate::services::use_api_client;
use crate::types::Notice;
use crate::visualization_path;

#[component]
pub fn SearchPage() -> impl IntoView {
    let client = store_value(use_api_client());
    let tracker = RequestTracker::new();
    {
        let tracker = tracker.clone();
        on_cleanup(move || tracker.cancel());
    }
    let tracker = store_value(tracker);

    let (query, set_query) = create_signal(String::new());
    let (results, set_results) = create_signal(Vec::<FundSummary>::new());
    let (searched, set_searched) = create_signal(false);
    let (loading, set_loading) = create_signal(false);
    let (notice, set_notice) = create_signal(None::<Notice>);

    // The query goes out as typed, empty included.
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let q = query.get_untracked();
        let client = client.get_value();
        let tracker = tracker.get_value();
        let token = tracker.begin();

        set_loading.set(true);
        set_notice.set(None);

        spawn_local(async move {
            let result = client.search(&q).await;
            if !tracker.is_current(token) {
                log::debug!("Discarding stale search results for '{}'", q);
                return;
            }
            set_loading.set(false);
            set_searched.set(true);
            match result {
                Ok(funds) => {
                    log::info!("Search '{}' returned {} funds", q, funds.len());
                    set_results.set(funds);
                }
                Err(err) => {
                    log::error!("Search '{}' failed: {}", q, err);
                    set_results.set(Vec::new());
                    set_notice.set(Some(Notice::error(err.user_message())));
                }
            }
        });
    };

    let navigate = use_navigate();
    let open = move |id: String| {
        let path = visualization_path(&id);
        log::info!("Opening hierarchy of {}", id);
        navigate(&path, Default::default());
    };

    view! {
        <section class="search-page">
            <h1>"Search funds"</h1>
            <form class="search-form" on:submit=on_submit>
                <input
                    type="search"
                    placeholder="Fund name, code or id"
                    prop:value=query
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
                <button type="submit" disabled=loading>
                    {move || if loading.get() { "Searching…" } else { "Search" }}
                </button>
            </form>

            <NoticeBanner notice=notice/>

            <Show when=move || searched.get() && results.with(Vec::is_empty) && notice.with(Option::is_none)>
                <p class="empty-state">"No funds found"</p>
            </Show>

            <ul class="result-list">
                <For
                    each=move || results.get()
                    key=|fund| fund.id.clone()
                    children=move |fund| {
                        let open = open.clone();
                        let id = fund.id.clone();
                        view! {
                            <li class="result-item" on:click=move |_| open(id.clone())>
                                <span class="result-label">{fund.label().to_string()}</span>
                                <span class="result-id">{fund.id.clone()}</span>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}
