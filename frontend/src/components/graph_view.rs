//! Hierarchy graph of one fund.
//!
//! The page fetches the fund record and its subfunds, builds a
//! [`HierarchyGraph`] and mounts a [`GraphCanvas`] for it. Changing the depth
//! or pressing "Refresh" refetches both and replaces the graph as a whole.

use fundref::{
    build_hierarchy, Depth, GraphNode, HierarchyGraph, ManagementEntity, NodeEntity, NodeKind,
    RequestTracker, Subtree,
};
use leptos::*;
use leptos_router::use_params_map;

use super::graph_canvas::GraphCanvas;
use super::managed_funds::ManagedFundsModal;
use super::notice::NoticeBanner;
use crate::services::use_api_client;
use crate::types::Notice;

/// Route parameter as typed by the user, percent-decoded.
pub fn decode_fund_id(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|id| id.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Depth chosen in the selector; anything unparsable keeps the current one.
fn parse_depth(value: &str) -> Option<Depth> {
    value.trim().parse::<i64>().ok().and_then(|d| Depth::try_from(d).ok())
}

#[component]
pub fn GraphViewPage() -> impl IntoView {
    let params = use_params_map();
    let fund_id = create_memo(move |_| {
        params.with(|p| decode_fund_id(p.get("fund_id").map(String::as_str).unwrap_or_default()))
    });

    let client = store_value(use_api_client());
    let tracker = RequestTracker::new();
    {
        let tracker = tracker.clone();
        on_cleanup(move || tracker.cancel());
    }
    let tracker = store_value(tracker);

    let depth = create_rw_signal(Depth::default());
    let refresh = create_rw_signal(0u32);
    let graph = create_rw_signal(None::<HierarchyGraph>);
    let selected = create_rw_signal(None::<String>);
    let managed = create_rw_signal(None::<ManagementEntity>);
    let loading = create_rw_signal(false);
    let notice = create_rw_signal(None::<Notice>);

    // Refetch on route, depth or refresh changes.
    create_effect(move |_| {
        let id = fund_id.get();
        let depth = depth.get();
        refresh.track();

        let client = client.get_value();
        let tracker = tracker.get_value();
        let token = tracker.begin();
        loading.set(true);
        notice.set(None);
        selected.set(None);

        spawn_local(async move {
            let fund = client.fund(&id).await;
            let fund = match fund {
                Ok(fund) => fund,
                Err(err) => {
                    if tracker.is_current(token) {
                        log::error!("Could not fetch fund {}: {}", id, err);
                        graph.set(None);
                        notice.set(Some(Notice::error(err.user_message())));
                        loading.set(false);
                    }
                    return;
                }
            };

            let subtree = client.subtree(&id, depth).await;
            if !tracker.is_current(token) {
                log::debug!("Discarding stale hierarchy of {} at depth {}", id, depth);
                return;
            }
            let subtree = subtree.unwrap_or_else(|err| {
                log::warn!("Subfunds of {} unavailable: {}", id, err);
                notice.set(Some(Notice::warning(format!(
                    "Subfunds unavailable: {}",
                    err.user_message()
                ))));
                Subtree {
                    root: fund.clone(),
                    children: Vec::new(),
                    depth,
                }
            });

            let built = build_hierarchy(&fund, &subtree);
            log::info!(
                "Hierarchy of {} at depth {}: {} nodes, {} edges",
                id,
                depth,
                built.nodes.len(),
                built.edges.len()
            );
            graph.set(Some(built));
            loading.set(false);
        });
    });

    let on_select = Callback::new(move |id: Option<String>| {
        if let Some(NodeEntity::ManagementEntity(entity)) = id.as_deref().and_then(|id| {
            graph.with_untracked(|g| g.as_ref().and_then(|g| g.node(id)).map(|n| n.entity.clone()))
        }) {
            managed.set(Some(entity));
        }
        selected.set(id);
    });

    let inspected = move || -> Option<GraphNode> {
        let id = selected.get()?;
        graph.with(|g| g.as_ref().and_then(|g| g.node(&id)).cloned())
    };

    view! {
        <section class="graph-page">
            <div class="graph-toolbar">
                <h1>{move || format!("Hierarchy of {}", fund_id.get())}</h1>
                <label class="depth-select">
                    "Depth "
                    <select on:change=move |ev| {
                        if let Some(d) = parse_depth(&event_target_value(&ev)) {
                            depth.set(d);
                        }
                    }>
                        {Depth::ALL
                            .into_iter()
                            .map(|d| {
                                view! {
                                    <option value=d.to_string() selected=move || depth.get() == d>
                                        {d.to_string()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </label>
                <button on:click=move |_| refresh.update(|n| *n += 1) disabled=loading>
                    "Refresh"
                </button>
            </div>

            <NoticeBanner notice=notice/>

            <div class="graph-legend">
                {NodeKind::ALL
                    .into_iter()
                    .map(|kind| {
                        let swatch = format!("background-color: {}", kind.style().color);
                        view! {
                            <span class="legend-item">
                                <span class="legend-swatch" style=swatch></span>
                                {kind.label()}
                            </span>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="graph-layout">
                <div class="graph-container">
                    <Show when=move || loading.get() && graph.with(Option::is_none)>
                        <p class="loading">"Loading hierarchy…"</p>
                    </Show>
                    {move || graph.get().map(|g| view! { <GraphCanvas graph=g on_select=on_select/> })}
                </div>

                <aside class="inspector">
                    {move || match inspected() {
                        Some(node) => {
                            let details = node
                                .entity
                                .details()
                                .into_iter()
                                .map(|(key, value)| {
                                    view! {
                                        <div class="detail-field">
                                            <span class="detail-label">{key}</span>
                                            <span class="detail-value">{value}</span>
                                        </div>
                                    }
                                })
                                .collect_view();
                            view! {
                                <div class="inspector-body">
                                    <span class="inspector-kind" style=format!("color: {}", node.style.color)>
                                        {node.kind().label()}
                                    </span>
                                    <h2>{node.label().to_string()}</h2>
                                    {details}
                                </div>
                            }
                            .into_view()
                        }
                        None => view! { <p class="inspector-hint">"Click a node to inspect it"</p> }.into_view(),
                    }}
                </aside>
            </div>

            {move || {
                managed
                    .get()
                    .map(|entity| {
                        view! { <ManagedFundsModal entity=entity on_close=move |_: ()| managed.set(None)/> }
                    })
            }}
        </section>
    }
}
