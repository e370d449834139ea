//! Procurement Order Modal
//!
//! Create and edit form for procurement orders.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::Modal;
use crate::context::use_api;
use crate::models::{ProcurementDraft, ProcurementOrder, ProcurementStatus};
use crate::query::{keys, use_query_client};
use crate::store::{toast_success, use_app_store};

fn blank_draft() -> ProcurementDraft {
    ProcurementDraft {
        quantity: 1,
        order_date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        ..Default::default()
    }
}

#[component]
pub fn ProcurementModal(
    #[prop(into)] show: Signal<bool>,
    /// `None` creates a new order
    #[prop(into)]
    order: Signal<Option<ProcurementOrder>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let store = use_app_store();
    let draft = RwSignal::new(blank_draft());
    // Number inputs keep their raw text until submit
    let quantity = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let problems = RwSignal::new(Vec::<(&'static str, &'static str)>::new());
    let (error, set_error) = signal(None::<String>);
    let (saving, set_saving) = signal(false);

    Effect::new(move |_| {
        if !show.get() {
            return;
        }
        let initial = order
            .with(|o| o.as_ref().map(ProcurementOrder::draft))
            .unwrap_or_else(blank_draft);
        quantity.set(initial.quantity.to_string());
        amount.set(initial.amount.to_string());
        draft.set(initial);
        problems.set(Vec::new());
        set_error.set(None);
    });

    let problem_for = move |field: &'static str| {
        move || {
            problems.with(|p| {
                p.iter()
                    .find(|(f, _)| *f == field)
                    .map(|(_, msg)| view! { <span class="field-error">{*msg}</span> })
            })
        }
    };

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut body = draft.get_untracked();
        body.quantity = quantity.get_untracked().trim().parse().unwrap_or(0);
        body.amount = amount.get_untracked().trim().parse().unwrap_or(f64::NAN);
        let found = body.problems();
        if !found.is_empty() {
            problems.set(found);
            return;
        }
        problems.set(Vec::new());
        let existing = order.with_untracked(|o| o.as_ref().map(|o| o.id.clone()));
        let api = api.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let result = match &existing {
                Some(id) => api.update_order(id, &body).await,
                None => api.create_order(&body).await,
            };
            set_saving.set(false);
            match result {
                Ok(saved) => {
                    log::info!("[Procurement] saved order {}", saved.id);
                    toast_success(&store, if existing.is_some() { "ההזמנה עודכנה" } else { "ההזמנה נוצרה" });
                    queries.with_value(|q| q.invalidate(&keys::orders()));
                    on_close.run(());
                }
                Err(err) => set_error.set(Some(err.user_message())),
            }
        });
    };

    let title = Signal::derive(move || {
        if order.with(Option::is_some) { "עריכת הזמנה" } else { "הזמנה חדשה" }.to_string()
    });

    view! {
        <Modal show=show title=title on_close=on_close wide=true>
            <form class="procurement-form" on:submit=submit>
                {move || error.get().map(|e| view! { <div class="form-error">{e}</div> })}
                <div class="form-grid">
                    <label class="field">
                        <span>"מק\"ט"</span>
                        <input
                            type="text"
                            prop:value=move || draft.with(|d| d.catalog_number.clone())
                            on:input=move |ev| draft.update(|d| d.catalog_number = event_target_value(&ev))
                        />
                        {problem_for("catalog_number")}
                    </label>
                    <label class="field">
                        <span>"יצרן"</span>
                        <input
                            type="text"
                            prop:value=move || draft.with(|d| d.manufacturer.clone())
                            on:input=move |ev| draft.update(|d| d.manufacturer = event_target_value(&ev))
                        />
                        {problem_for("manufacturer")}
                    </label>
                    <label class="field field-wide">
                        <span>"תיאור"</span>
                        <textarea
                            rows="2"
                            prop:value=move || draft.with(|d| d.description.clone())
                            on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                        ></textarea>
                    </label>
                    <label class="field">
                        <span>"כמות"</span>
                        <input
                            type="number"
                            min="1"
                            prop:value=move || quantity.get()
                            on:input=move |ev| quantity.set(event_target_value(&ev))
                        />
                        {problem_for("quantity")}
                    </label>
                    <label class="field">
                        <span>"סכום"</span>
                        <input
                            type="number"
                            min="0"
                            step="0.01"
                            prop:value=move || amount.get()
                            on:input=move |ev| amount.set(event_target_value(&ev))
                        />
                        {problem_for("amount")}
                    </label>
                    <label class="field">
                        <span>"תאריך הזמנה"</span>
                        <input
                            type="date"
                            prop:value=move || draft.with(|d| d.order_date.clone())
                            on:input=move |ev| draft.update(|d| d.order_date = event_target_value(&ev))
                        />
                        {problem_for("order_date")}
                    </label>
                    <label class="field">
                        <span>"סטטוס"</span>
                        <select on:change=move |ev| {
                            if let Some(status) = ProcurementStatus::parse(&event_target_value(&ev)) {
                                draft.update(|d| d.status = status);
                            }
                        }>
                            {ProcurementStatus::ALL
                                .into_iter()
                                .map(|status| view! {
                                    <option
                                        value=status.as_str()
                                        selected=move || draft.with(|d| d.status == status)
                                    >
                                        {status.label()}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </label>
                    <label class="field field-checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || draft.with(|d| d.received_emf)
                            on:change=move |_| draft.update(|d| d.received_emf = !d.received_emf)
                        />
                        "התקבל EMF"
                    </label>
                    <label class="field field-checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || draft.with(|d| d.received_bom)
                            on:change=move |_| draft.update(|d| d.received_bom = !d.received_bom)
                        />
                        "התקבל BOM"
                    </label>
                </div>
                <div class="modal-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "שומר..." } else { "שמירה" }}
                    </button>
                    <button type="button" class="btn" on:click=move |_| on_close.run(())>"ביטול"</button>
                </div>
            </form>
        </Modal>
    }
}
