//! CSV ingestion, one upload slot per dataset.
//!
//! Each slot previews the first records of the chosen file locally and
//! uploads it to `/ingest/upload` on demand. Slots are independent: a slow
//! upload in one never blocks another.

use fundref::{preview_bytes, Dataset, SlotStatus, UploadSlot, PREVIEW_ROWS};
use leptos::*;
use web_sys::{Event, File, HtmlInputElement};

use crate::services::{read_file_bytes, upload_dataset, use_api_client};

type Slot = UploadSlot<File>;

/// CSS classes of a slot status line.
pub fn status_class(status: &SlotStatus) -> String {
    format!("slot-status slot-status-{}", status.tag())
}

#[component]
pub fn CsvImportPage() -> impl IntoView {
    view! {
        <section class="import-page">
            <h1>"Import referential data"</h1>
            <p class="import-hint">"Choose a CSV file per dataset, check the preview, then upload."</p>
            <div class="slot-grid">
                {Dataset::ALL
                    .into_iter()
                    .map(|dataset| view! { <UploadSlotCard dataset=dataset/> })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn UploadSlotCard(dataset: Dataset) -> impl IntoView {
    let client = store_value(use_api_client());
    let slot = create_rw_signal(Slot::new(dataset));
    let input_ref = create_node_ref::<html::Input>();

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let name = file.name();
        log::info!("{}: selected {}", dataset, name);

        let mut ticket = None;
        slot.update(|s| ticket = Some(s.select(file.clone(), name)));
        let Some(ticket) = ticket else {
            return;
        };

        spawn_local(async move {
            let preview = match read_file_bytes(&file).await {
                Ok(bytes) => preview_bytes(&bytes, PREVIEW_ROWS)
                    .map(|p| {
                        log::debug!("{}: preview decoded as {}", dataset, p.encoding);
                        p.rows
                    })
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e),
            };
            if let Err(e) = &preview {
                log::warn!("{}: no preview: {}", dataset, e);
            }
            slot.update(|s| {
                if !s.set_preview(ticket, preview) {
                    log::debug!("{}: discarding stale preview", dataset);
                }
            });
        });
    };

    let on_upload = move |_: web_sys::MouseEvent| {
        let mut started = None;
        slot.update(|s| started = s.begin_upload());
        let Some((file, ticket)) = started else {
            log::warn!("{}: upload clicked without a file", dataset);
            return;
        };
        let client = client.get_value();

        spawn_local(async move {
            let result = upload_dataset(&client, file, dataset).await;
            match &result {
                Ok(receipt) => log::info!("{}: ingested ({:?})", dataset, receipt.detail),
                Err(err) => log::error!("{}: upload failed: {}", dataset, err),
            }
            slot.update(|s| {
                if !s.complete(ticket, result) {
                    log::debug!("{}: discarding stale upload result", dataset);
                }
            });
        });
    };

    let on_clear = move |_: web_sys::MouseEvent| {
        slot.update(Slot::clear);
        if let Some(input) = input_ref.get_untracked() {
            input.set_value("");
        }
    };

    let status = move || slot.with(|s| s.status().clone());

    view! {
        <div class="slot-card">
            <h2>{dataset.label()}</h2>
            <input
                type="file"
                accept=".csv,text/csv"
                node_ref=input_ref
                on:change=on_file_change
            />
            <div class="slot-file">
                {move || slot.with(|s| s.file_name().map(str::to_string)).unwrap_or_else(|| "No file chosen".into())}
            </div>

            <div class="slot-actions">
                <button
                    class="button"
                    on:click=on_upload
                    disabled=move || slot.with(|s| s.status().is_loading())
                >
                    {move || if status().is_loading() { "Uploading…" } else { "Upload" }}
                </button>
                <button class="button-secondary" on:click=on_clear>"Clear"</button>
            </div>

            {move || {
                let status = status();
                status.message().map(|message| {
                    view! { <div class=status_class(&status)>{message.to_string()}</div> }
                })
            }}

            {move || slot.with(|s| s.preview().cloned()).map(|preview| match preview {
                Ok(rows) => view! { <PreviewTable rows=rows/> }.into_view(),
                Err(reason) => view! { <p class="preview-error">{reason}</p> }.into_view(),
            })}
        </div>
    }
}

#[component]
fn PreviewTable(rows: Vec<Vec<String>>) -> impl IntoView {
    view! {
        <table class="preview-table">
            <tbody>
                {rows
                    .into_iter()
                    .map(|row| {
                        view! {
                            <tr>
                                {row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}
