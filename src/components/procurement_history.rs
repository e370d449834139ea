//! Order History Modal
//!
//! The audit trail of one procurement order.

use leptos::prelude::*;

use crate::components::log_timeline::{describe_changes, ChangeList};
use crate::components::{Modal, Spinner};
use crate::context::use_api;
use crate::format::format_date_time;
use crate::models::{action_label, AuditLogQuery};
use crate::query::{keys, use_query};

pub const ORDER_RESOURCE: &str = "procurement_order";

#[component]
pub fn ProcurementHistory(
    /// `(order id, catalog number)` of the order to show
    #[prop(into)]
    order: Signal<Option<(String, String)>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let logs = use_query(
        move || order.get().map(|(id, _)| id),
        |id: &String| keys::resource_logs(ORDER_RESOURCE, id),
        move |id: String| {
            let api = api.get_value();
            async move {
                api.resource_logs(ORDER_RESOURCE, &id, AuditLogQuery::default())
                    .await
            }
        },
    );

    let title = Signal::derive(move || {
        let number = order.with(|o| o.as_ref().map(|(_, n)| n.clone()).unwrap_or_default());
        format!("היסטוריית הזמנה {}", number)
    });

    view! {
        <Modal show=Signal::derive(move || order.with(Option::is_some)) title=title on_close=on_close>
            {move || {
                if logs.loading.get() && logs.data.with(Option::is_none) {
                    return view! { <Spinner /> }.into_any();
                }
                if let Some(message) = logs.error_message() {
                    return view! { <div class="form-error">{message}</div> }.into_any();
                }
                let entries = logs.data.with(|d| d.as_ref().map(|p| p.logs.clone()).unwrap_or_default());
                if entries.is_empty() {
                    return view! { <div class="empty">"אין היסטוריה להצגה"</div> }.into_any();
                }
                view! {
                    <div class="history-timeline">
                        {entries
                            .into_iter()
                            .map(|entry| {
                                let lines = entry.changes.as_ref().map(describe_changes).unwrap_or_default();
                                view! {
                                    <div class="history-item">
                                        <div class="history-header">
                                            <span class="action-badge">{action_label(&entry.action).to_string()}</span>
                                            <span class="history-actor">{entry.actor.clone()}</span>
                                            <span class="history-date">{format_date_time(Some(&entry.timestamp))}</span>
                                        </div>
                                        <ChangeList lines=lines />
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_any()
            }}
        </Modal>
    }
}
