//! Footer component

use leptos::*;

use crate::config::{api_config, APP_NAME};

#[component]
pub fn Footer() -> impl IntoView {
    let api = api_config();

    view! {
        <footer>
            <div>{APP_NAME} " • Powered by " <span class="rust-badge">"Rust + Leptos"</span></div>
            <div class="footer-api">"API: " <code>{api.base_url().to_string()}</code></div>
        </footer>
    }
}
