use leptos::*;
use leptos_router::*;

use crate::config::APP_NAME;

/// Top bar with navigation between the views.
#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <A href="/" class="logo">{APP_NAME}</A>
            </div>
            <nav class="header-right">
                <A href="/" exact=true class="nav-link">"Search"</A>
                <A href="/funds" class="nav-link">"Funds"</A>
                <A href="/import" class="nav-link">"Import"</A>
            </nav>
        </header>
    }
}
