//! Excel Panel Component
//!
//! Import (standard sheet or project allocations) and export (everything,
//! or the rows matching the current filters).

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api::{export_filename, XLSX_MIME};
use crate::browser;
use crate::context::use_api;
use crate::models::{ExportMode, ImportKind, ItemQuery};
use crate::query::{keys, use_query_client};
use crate::store::{toast_error, toast_success, toast_warning, use_app_store};

#[component]
pub fn ExcelPanel(#[prop(into)] query: Signal<ItemQuery>, #[prop(into)] can_import: Signal<bool>) -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let store = use_app_store();
    let file_ref = NodeRef::<html::Input>::new();
    let (kind, set_kind) = signal(ImportKind::Standard);
    let (importing, set_importing) = signal(false);
    let (exporting, set_exporting) = signal(false);

    let on_file = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Picking the same file again must fire change
        input.set_value("");

        let api = api.get_value();
        let kind = kind.get_untracked();
        set_importing.set(true);
        spawn_local(async move {
            let name = file.name();
            let bytes = match browser::read_file(&file).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::error!("[Excel] reading {} failed: {}", name, err);
                    toast_warning(&store, "קריאת הקובץ נכשלה");
                    set_importing.set(false);
                    return;
                }
            };
            log::info!("[Excel] importing {} ({} bytes, {:?})", name, bytes.len(), kind);
            match api.import_file(kind, &name, bytes).await {
                Ok(outcome) => {
                    toast_success(&store, outcome.summary());
                    queries.with_value(|q| {
                        q.invalidate(&keys::items());
                        q.invalidate(&keys::analytics());
                    });
                }
                Err(err) => toast_error(&store, &err),
            }
            set_importing.set(false);
        });
    };

    let export = move |mode: ExportMode| {
        let api = api.get_value();
        let query = query.get_untracked();
        set_exporting.set(true);
        spawn_local(async move {
            match api.export_excel(&query, mode).await {
                Ok(bytes) => {
                    let filename = export_filename(chrono::Local::now().date_naive());
                    if let Err(err) = browser::download_bytes(&bytes, &filename, XLSX_MIME) {
                        log::error!("[Excel] download failed: {}", err);
                        toast_warning(&store, "ההורדה נכשלה");
                    }
                }
                Err(err) => toast_error(&store, &err),
            }
            set_exporting.set(false);
        });
    };

    view! {
        <div class="excel-panel">
            <Show when=move || can_import.get()>
                <select
                    class="import-kind"
                    on:change=move |ev| {
                        set_kind.set(match event_target_value(&ev).as_str() {
                            "projects" => ImportKind::Projects,
                            _ => ImportKind::Standard,
                        })
                    }
                >
                    <option value="standard">"ייבוא פריטים"</option>
                    <option value="projects">"ייבוא שריונים לפרויקטים"</option>
                </select>
                <input node_ref=file_ref type="file" accept=".xlsx,.xls" class="hidden" on:change=on_file />
                <button
                    class="btn"
                    disabled=move || importing.get()
                    on:click=move |_| {
                        if let Some(input) = file_ref.get() {
                            input.click();
                        }
                    }
                >
                    {move || if importing.get() { "מייבא..." } else { "ייבוא מאקסל" }}
                </button>
            </Show>
            <button class="btn" disabled=move || exporting.get() on:click=move |_| export(ExportMode::Current)>
                "ייצוא תצוגה נוכחית"
            </button>
            <button class="btn" disabled=move || exporting.get() on:click=move |_| export(ExportMode::All)>
                "ייצוא הכל"
            </button>
        </div>
    }
}
