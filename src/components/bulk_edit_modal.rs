//! Bulk Edit Modal
//!
//! Overwrites purpose, notes and/or target site on every selected item.
//! Each field is opt-in; an unchecked field is left untouched.

use leptos::prelude::*;

use crate::components::Modal;
use crate::context::use_config;
use crate::models::BulkUpdate;

/// Checked fields become the update; `None` when nothing is checked
pub fn bulk_update_from(
    purpose: Option<String>,
    notes: Option<String>,
    target_site: Option<String>,
) -> Option<BulkUpdate> {
    let update = BulkUpdate::Fields {
        notes,
        purpose,
        target_site,
    };
    (!update.is_empty()).then_some(update)
}

#[derive(Clone, Copy)]
struct OptInField {
    enabled: RwSignal<bool>,
    value: RwSignal<String>,
}

impl OptInField {
    fn new() -> Self {
        Self {
            enabled: RwSignal::new(false),
            value: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.enabled.set(false);
        self.value.set(String::new());
    }

    fn take(&self) -> Option<String> {
        self.enabled.get_untracked().then(|| self.value.get_untracked())
    }
}

#[component]
fn OptInRow(label: &'static str, field: OptInField, children: Children) -> impl IntoView {
    view! {
        <div class="bulk-field-row">
            <label class="bulk-checkbox">
                <input
                    type="checkbox"
                    prop:checked=move || field.enabled.get()
                    on:change=move |_| field.enabled.update(|e| *e = !*e)
                />
                {label}
            </label>
            {children()}
        </div>
    }
}

#[component]
pub fn BulkEditModal(
    #[prop(into)] show: Signal<bool>,
    #[prop(into)] count: Signal<usize>,
    #[prop(into)] on_confirm: Callback<BulkUpdate>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let target_sites = StoredValue::new(use_config().target_sites);
    let purpose = OptInField::new();
    let notes = OptInField::new();
    let site = OptInField::new();

    let close = Callback::new(move |_: ()| {
        purpose.reset();
        notes.reset();
        site.reset();
        on_close.run(());
    });
    let confirm = move |_: leptos::ev::MouseEvent| {
        if let Some(update) = bulk_update_from(purpose.take(), notes.take(), site.take()) {
            on_confirm.run(update);
            close.run(());
        }
    };
    let any_enabled =
        move || purpose.enabled.get() || notes.enabled.get() || site.enabled.get();

    view! {
        <Modal show=show title="עדכון מרובה".to_string() on_close=close>
            <p>"בחר את השדות שברצונך לעדכן:"</p>
            <OptInRow label="יעוד" field=purpose>
                <input
                    type="text"
                    placeholder="הכנס יעוד חדש"
                    disabled=move || !purpose.enabled.get()
                    prop:value=move || purpose.value.get()
                    on:input=move |ev| purpose.value.set(event_target_value(&ev))
                />
            </OptInRow>
            <OptInRow label="אתר יעד" field=site>
                <select
                    disabled=move || !site.enabled.get()
                    on:change=move |ev| site.value.set(event_target_value(&ev))
                >
                    <option value="">"בחר אתר..."</option>
                    {target_sites
                        .get_value()
                        .iter()
                        .map(|s| view! { <option value=s.clone()>{s.clone()}</option> })
                        .collect_view()}
                </select>
            </OptInRow>
            <OptInRow label="הערות" field=notes>
                <input
                    type="text"
                    placeholder="הכנס הערה"
                    disabled=move || !notes.enabled.get()
                    prop:value=move || notes.value.get()
                    on:input=move |ev| notes.value.set(event_target_value(&ev))
                />
            </OptInRow>
            <div class="warning-box">
                "השינויים יחולו על כל הפריטים שנבחרו ודורסים ערכים קיימים."
            </div>
            <div class="modal-actions">
                <button class="btn btn-primary" disabled=move || !any_enabled() on:click=confirm>
                    {move || format!("עדכן {} פריטים", count.get())}
                </button>
                <button class="btn" on:click=move |_| close.run(())>"ביטול"</button>
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_checked_fields_are_sent() {
        assert_eq!(bulk_update_from(None, None, None), None);
        let update = bulk_update_from(None, Some(String::new()), Some("Haifa".into()));
        assert_eq!(
            update,
            Some(BulkUpdate::Fields {
                notes: Some(String::new()),
                purpose: None,
                target_site: Some("Haifa".into()),
            })
        );
    }
}
