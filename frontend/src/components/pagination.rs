//! Page links under a list.

use fundref::{PageLink, Pagination};
use leptos::*;

/// One button per page; nothing at all for an empty list.
#[component]
pub fn PaginationControl(
    #[prop(into)] pagination: Signal<Pagination>,
    #[prop(into)] on_select: Callback<PageLink>,
) -> impl IntoView {
    view! {
        <nav class="pagination">
            {move || {
                pagination
                    .get()
                    .links()
                    .map(|link| {
                        view! {
                            <button
                                class="page-link"
                                class:active=link.active
                                disabled=link.active
                                on:click=move |_| on_select.call(link)
                            >
                                {link.number}
                            </button>
                        }
                    })
                    .collect_view()
            }}
        </nav>
    }
}
