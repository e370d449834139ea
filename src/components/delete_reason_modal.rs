//! Delete Reason Modal
//!
//! Every delete asks for a reason, which the backend stores in the audit
//! log. Confirm stays disabled until the reason is long enough.

use leptos::prelude::*;

use crate::components::Modal;
use crate::validate;

#[component]
pub fn DeleteReasonModal(
    #[prop(into)] show: Signal<bool>,
    #[prop(into)] message: Signal<String>,
    #[prop(into)] on_confirm: Callback<String>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let (reason, set_reason) = signal(String::new());
    let valid = move || validate::delete_reason(&reason.get());

    // Start empty each time it opens
    Effect::new(move |_| {
        if show.get() {
            set_reason.set(String::new());
        }
    });

    let confirm = move || {
        if !valid() {
            return;
        }
        on_confirm.run(reason.get_untracked().trim().to_string());
    };

    view! {
        <Modal show=show title="אישור מחיקה".to_string() on_close=on_close>
            <p class="delete-message">{move || message.get()}</p>
            <label class="field">
                <span>"סיבת המחיקה"</span>
                <textarea
                    rows="3"
                    prop:value=move || reason.get()
                    on:input=move |ev| set_reason.set(event_target_value(&ev))
                ></textarea>
            </label>
            <Show when=move || !reason.get().is_empty() && !valid()>
                <p class="field-error">
                    {format!("יש להזין לפחות {} תווים", validate::MIN_REASON_LEN)}
                </p>
            </Show>
            <div class="modal-actions">
                <button class="btn btn-danger" disabled=move || !valid() on:click=move |_| confirm()>
                    "מחק"
                </button>
                <button class="btn" on:click=move |_| on_close.run(())>"ביטול"</button>
            </div>
        </Modal>
    }
}
