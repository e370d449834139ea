//! Procurement Files Modal
//!
//! Attachments of one order: download, and for editors upload and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api::UploadPart;
use crate::browser;
use crate::components::Modal;
use crate::context::use_api;
use crate::format::{format_date, format_file_size};
use crate::models::{ProcurementFile, ProcurementOrder};
use crate::query::{keys, use_query_client};
use crate::store::{toast_error, toast_success, toast_warning, use_app_store};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
const ACCEPTED: &str = ".pdf,.jpg,.jpeg,.png,.gif,.xlsx,.xls,.doc,.docx,.txt";

/// Refuse files over the upload limit
pub fn check_upload_size(size: u64) -> Result<(), String> {
    if size > MAX_UPLOAD_BYTES {
        return Err(format!(
            "הקובץ גדול מדי. הגודל המקסימלי הוא {}MB",
            MAX_UPLOAD_BYTES / 1024 / 1024
        ));
    }
    Ok(())
}

fn mime_or_default(mime: String) -> String {
    if mime.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime
    }
}

#[component]
pub fn ProcurementFiles(
    #[prop(into)] order: Signal<Option<ProcurementOrder>>,
    #[prop(into)] can_edit: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let store = use_app_store();
    let (uploading, set_uploading) = signal(false);
    let (deleting, set_deleting) = signal(None::<String>);

    let order_id = move || order.with_untracked(|o| o.as_ref().map(|o| o.id.clone()));
    // The page re-reads the order from the refreshed list
    let changed = move || queries.with_value(|q| q.invalidate(&keys::orders()));

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
        input.set_value("");
        let Some(id) = order_id() else {
            return;
        };
        if let Err(msg) = check_upload_size(file.size() as u64) {
            toast_warning(&store, msg);
            return;
        }
        let api = api.get_value();
        set_uploading.set(true);
        spawn_local(async move {
            let part = match browser::read_file(&file).await {
                Ok(bytes) => UploadPart {
                    field: "file".to_string(),
                    filename: file.name(),
                    mime: mime_or_default(file.type_()),
                    bytes,
                },
                Err(err) => {
                    log::error!("[Procurement] reading upload failed: {}", err);
                    toast_warning(&store, "קריאת הקובץ נכשלה");
                    set_uploading.set(false);
                    return;
                }
            };
            match api.upload_order_file(&id, part).await {
                Ok(uploaded) => {
                    log::info!("[Procurement] uploaded {} to {}", uploaded.filename, id);
                    toast_success(&store, "הקובץ הועלה בהצלחה");
                    changed();
                }
                Err(err) => toast_error(&store, &err),
            }
            set_uploading.set(false);
        });
    };

    let download = move |file: ProcurementFile| {
        let Some(id) = order_id() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            let result = api
                .download_order_file(&id, &file.file_id)
                .await
                .map_err(|e| e.to_string())
                .and_then(|bytes| {
                    browser::download_bytes(&bytes, &file.filename, &mime_or_default(file.file_type.clone()))
                });
            if let Err(err) = result {
                log::error!("[Procurement] download of {} failed: {}", file.filename, err);
                toast_warning(&store, "שגיאה בהורדת הקובץ");
            }
        });
    };

    let delete = move |file_id: String| {
        if !browser::confirm("האם אתה בטוח שברצונך למחוק קובץ זה?") {
            return;
        }
        let Some(id) = order_id() else {
            return;
        };
        let api = api.get_value();
        set_deleting.set(Some(file_id.clone()));
        spawn_local(async move {
            match api.delete_order_file(&id, &file_id).await {
                Ok(_) => {
                    toast_success(&store, "הקובץ נמחק בהצלחה");
                    changed();
                }
                Err(err) => toast_error(&store, &err),
            }
            set_deleting.set(None);
        });
    };

    let title = Signal::derive(move || {
        order.with(|o| {
            o.as_ref()
                .map(|o| format!("קבצים מצורפים - {}", o.catalog_number))
                .unwrap_or_default()
        })
    });

    view! {
        <Modal show=Signal::derive(move || order.with(Option::is_some)) title=title on_close=on_close>
            <div class="files-list">
                {move || {
                    let files = order.with(|o| o.as_ref().map(|o| o.files.clone()).unwrap_or_default());
                    if files.is_empty() {
                        return view! { <div class="empty">"אין קבצים מצורפים"</div> }.into_any();
                    }
                    files
                        .into_iter()
                        .map(|file| {
                            let file_id = file.file_id.clone();
                            let busy = {
                                let file_id = file_id.clone();
                                move || deleting.with(|d| d.as_deref() == Some(file_id.as_str()))
                            };
                            let meta = format!(
                                "{} • {}",
                                format_file_size(file.file_size),
                                format_date(file.uploaded_at.as_deref())
                            );
                            let name = file.filename.clone();
                            view! {
                                <div class="file-item">
                                    <div class="file-info">
                                        <span class="file-name">{name}</span>
                                        <span class="file-meta">{meta}</span>
                                    </div>
                                    <div class="file-actions">
                                        <button class="btn-icon" title="הורד" on:click=move |_| download(file.clone())>
                                            "⬇"
                                        </button>
                                        <Show when=move || can_edit.get()>
                                            <button
                                                class="btn-icon"
                                                title="מחק"
                                                disabled=busy.clone()
                                                on:click={
                                                    let file_id = file_id.clone();
                                                    move |_| delete(file_id.clone())
                                                }
                                            >
                                                {let busy = busy.clone(); move || if busy() { "..." } else { "🗑" }}
                                            </button>
                                        </Show>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()
                        .into_any()
                }}
            </div>
            <Show when=move || can_edit.get()>
                <div class="upload-section">
                    <h3>"העלאת קובץ חדש"</h3>
                    <input type="file" accept=ACCEPTED disabled=move || uploading.get() on:change=on_file />
                    <Show when=move || uploading.get()>
                        <span class="uploading">"מעלה קובץ..."</span>
                    </Show>
                </div>
            </Show>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_size_limit() {
        assert!(check_upload_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(check_upload_size(MAX_UPLOAD_BYTES + 1).is_err());
    }
}
