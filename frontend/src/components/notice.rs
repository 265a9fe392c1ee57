use leptos::*;

use crate::types::Notice;

/// Inline message slot; renders nothing while empty.
#[component]
pub fn NoticeBanner(#[prop(into)] notice: Signal<Option<Notice>>) -> impl IntoView {
    move || {
        notice.get().map(|n| {
            view! {
                <div class=n.level.css_class()>
                    <span class="notice-time">{n.timestamp}</span>
                    <span class="notice-message">{n.message}</span>
                </div>
            }
        })
    }
}
