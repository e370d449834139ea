//! Procurement Page
//!
//! Orders in process or completed, with create/edit, attachments, history
//! and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{
    DeleteReasonModal, Pager, ProcurementFiles, ProcurementHistory, ProcurementModal, Spinner,
};
use crate::context::{use_api, use_auth};
use crate::format::{format_date, format_number};
use crate::models::{Permission, ProcurementOrder, ProcurementQuery, ProcurementTab};
use crate::pagination::Pagination;
use crate::query::{keys, use_query, use_query_client};
use crate::store::{toast_error, toast_success, use_app_store};

const ORDERS_PER_PAGE: u64 = 50;

/// Search fields; applied on submit
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderFilter {
    pub catalog_number: String,
    pub manufacturer: String,
}

impl OrderFilter {
    pub fn is_empty(&self) -> bool {
        self.catalog_number.trim().is_empty() && self.manufacturer.trim().is_empty()
    }

    pub fn to_query(&self, tab: ProcurementTab, pagination: &Pagination) -> ProcurementQuery {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        ProcurementQuery {
            page: pagination.page,
            page_size: pagination.per_page,
            catalog_number: non_empty(&self.catalog_number),
            manufacturer: non_empty(&self.manufacturer),
            tab,
        }
    }
}

/// Amount with two decimals and thousands separators
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return String::new();
    }
    let cents = format!("{:.2}", amount.abs());
    let (int_part, frac) = cents.split_once('.').unwrap_or((&cents, "00"));
    let whole = format_number(int_part.parse::<f64>().unwrap_or(0.0));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, whole, frac)
}

#[component]
pub fn ProcurementPage() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let auth = use_auth();
    let store = use_app_store();

    let (tab, set_tab) = signal(ProcurementTab::InProcess);
    let pagination = RwSignal::new(Pagination::new(ORDERS_PER_PAGE));
    let draft = RwSignal::new(OrderFilter::default());
    let applied = RwSignal::new(OrderFilter::default());

    let list = use_query(
        move || Some(applied.with(|f| f.to_query(tab.get(), &pagination.get()))),
        keys::orders_list,
        move |query: ProcurementQuery| {
            let api = api.get_value();
            async move { api.list_orders(&query).await }
        },
    );
    let orders = Signal::derive(move || list.data.with(|d| d.as_ref().map(|p| p.orders.clone()).unwrap_or_default()));
    let total = Signal::derive(move || list.data.with(|d| d.as_ref().map_or(0, |p| p.total)));
    let can_edit = Signal::derive(move || auth.has_permission(Permission::ProcurementWrite));

    let (editing, set_editing) = signal(false);
    let edit_order = RwSignal::new(None::<ProcurementOrder>);
    let files_order_id = RwSignal::new(None::<String>);
    let history_order = RwSignal::new(None::<(String, String)>);
    let delete_order = RwSignal::new(None::<ProcurementOrder>);

    // Follows the list so uploads show up without reopening
    let files_order = Signal::derive(move || {
        let id = files_order_id.get()?;
        orders.with(|orders| orders.iter().find(|o| o.id == id).cloned())
    });

    let switch_tab = move |next: ProcurementTab| {
        set_tab.set(next);
        pagination.update(|p| p.go_to(1));
    };
    let search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        applied.set(draft.get_untracked());
        pagination.update(|p| p.go_to(1));
    };
    let clear = move |_: leptos::ev::MouseEvent| {
        draft.set(OrderFilter::default());
        applied.set(OrderFilter::default());
        pagination.update(|p| p.go_to(1));
    };

    let confirm_delete = Callback::new(move |reason: String| {
        let Some(order) = delete_order.get_untracked() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            match api.delete_order(&order.id, &reason).await {
                Ok(_) => {
                    log::info!("[Procurement] deleted order {}", order.id);
                    toast_success(&store, "הזמנה נמחקה בהצלחה");
                    delete_order.set(None);
                    queries.with_value(|q| q.invalidate(&keys::orders()));
                }
                Err(err) => toast_error(&store, &err),
            }
        });
    });

    let tab_class = move |t: ProcurementTab| {
        move || if tab.get() == t { "tab-btn active" } else { "tab-btn" }
    };

    view! {
        <div class="procurement-page">
            <div class="procurement-header">
                <Show when=move || can_edit.get()>
                    <button
                        class="btn btn-primary"
                        on:click=move |_| {
                            edit_order.set(None);
                            set_editing.set(true);
                        }
                    >
                        "+ הזמנה חדשה"
                    </button>
                </Show>
            </div>
            <div class="access-tabs">
                <button class=tab_class(ProcurementTab::InProcess) on:click=move |_| switch_tab(ProcurementTab::InProcess)>
                    "בתהליך"
                </button>
                <button class=tab_class(ProcurementTab::Completed) on:click=move |_| switch_tab(ProcurementTab::Completed)>
                    "הסתיים"
                </button>
            </div>
            <form class="search-form procurement-controls" on:submit=search>
                <input
                    type="text"
                    class="search-input"
                    placeholder="חפש לפי מק\"ט..."
                    prop:value=move || draft.with(|f| f.catalog_number.clone())
                    on:input=move |ev| draft.update(|f| f.catalog_number = event_target_value(&ev))
                />
                <input
                    type="text"
                    class="search-input"
                    placeholder="חפש לפי יצרן..."
                    prop:value=move || draft.with(|f| f.manufacturer.clone())
                    on:input=move |ev| draft.update(|f| f.manufacturer = event_target_value(&ev))
                />
                <button type="submit" class="btn btn-secondary">"חפש"</button>
                <Show when=move || !draft.with(OrderFilter::is_empty)>
                    <button type="button" class="btn" on:click=clear>"נקה"</button>
                </Show>
            </form>

            {move || list.error_message().map(|m| view! { <div class="form-error">{m}</div> })}
            {move || {
                if list.loading.get() && list.data.with(Option::is_none) {
                    return view! { <div class="loading-container"><Spinner /></div> }.into_any();
                }
                view! {
                    <div class="procurement-table-container">
                        <table class="procurement-table">
                            <thead>
                                <tr>
                                    <th>"מק\"ט"</th>
                                    <th>"יצרן"</th>
                                    <th class="desc-col">"תיאור"</th>
                                    <th>"כמות"</th>
                                    <th>"סכום"</th>
                                    <th>"תאריך הזמנה"</th>
                                    <th>"סטטוס"</th>
                                    <th>"EMF"</th>
                                    <th>"BOM"</th>
                                    <th>"קבצים"</th>
                                    <th>"פעולות"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || orders.with(Vec::is_empty)>
                                    <tr>
                                        <td colspan="11" class="no-data">"אין הזמנות להצגה"</td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || orders.get()
                                    key=|order| serde_json::to_string(order).unwrap_or_else(|_| order.id.clone())
                                    children=move |order| {
                                        let dot = |on: bool| if on { "status-dot green" } else { "status-dot red" };
                                        let status_class = format!("status-badge status-{}", order.status.as_str());
                                        let file_count = order.files.len();
                                        let for_files = order.id.clone();
                                        let for_history = (order.id.clone(), order.catalog_number.clone());
                                        let for_edit = order.clone();
                                        let for_delete = order.clone();
                                        view! {
                                            <tr>
                                                <td>{order.catalog_number.clone()}</td>
                                                <td>{order.manufacturer.clone()}</td>
                                                <td class="desc-col" title=order.description.clone()>{order.description.clone()}</td>
                                                <td>{order.quantity}</td>
                                                <td>{format_amount(order.amount)}</td>
                                                <td>{format_date(Some(&order.order_date))}</td>
                                                <td><span class=status_class>{order.status.label()}</span></td>
                                                <td><span class=dot(order.received_emf)></span></td>
                                                <td><span class=dot(order.received_bom)></span></td>
                                                <td>
                                                    <button
                                                        class="btn-icon"
                                                        title="קבצים"
                                                        on:click=move |_| files_order_id.set(Some(for_files.clone()))
                                                    >
                                                        "📎"
                                                    </button>
                                                    <span class="file-count">{file_count}</span>
                                                </td>
                                                <td class="actions-cell">
                                                    <button
                                                        class="btn-icon"
                                                        title="היסטוריה"
                                                        on:click=move |_| history_order.set(Some(for_history.clone()))
                                                    >
                                                        "🕓"
                                                    </button>
                                                    <Show when=move || can_edit.get()>
                                                        <button
                                                            class="btn-icon"
                                                            title="ערוך"
                                                            on:click={
                                                                let order = for_edit.clone();
                                                                move |_| {
                                                                    edit_order.set(Some(order.clone()));
                                                                    set_editing.set(true);
                                                                }
                                                            }
                                                        >
                                                            "✎"
                                                        </button>
                                                        <button
                                                            class="btn-icon btn-danger"
                                                            title="מחק"
                                                            on:click={
                                                                let order = for_delete.clone();
                                                                move |_| delete_order.set(Some(order.clone()))
                                                            }
                                                        >
                                                            "🗑"
                                                        </button>
                                                    </Show>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                }
                    .into_any()
            }}
            <Pager pagination=pagination total=total />

            <ProcurementModal
                show=editing
                order=edit_order
                on_close=Callback::new(move |_: ()| set_editing.set(false))
            />
            <ProcurementFiles
                order=files_order
                can_edit=can_edit
                on_close=Callback::new(move |_: ()| files_order_id.set(None))
            />
            <ProcurementHistory
                order=history_order
                on_close=Callback::new(move |_: ()| history_order.set(None))
            />
            <DeleteReasonModal
                show=Signal::derive(move || delete_order.with(Option::is_some))
                message=Signal::derive(move || {
                    delete_order.with(|o| {
                        o.as_ref()
                            .map(|o| format!("האם למחוק את ההזמנה {}?", o.catalog_number))
                            .unwrap_or_default()
                    })
                })
                on_confirm=confirm_delete
                on_close=Callback::new(move |_: ()| delete_order.set(None))
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_filter_query() {
        let filter = OrderFilter {
            catalog_number: " PN-7 ".to_string(),
            manufacturer: String::new(),
        };
        assert!(!filter.is_empty());
        let query = filter.to_query(ProcurementTab::Completed, &Pagination::new(50));
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 50);
        assert_eq!(query.catalog_number.as_deref(), Some("PN-7"));
        assert_eq!(query.manufacturer, None);
        assert_eq!(query.tab, ProcurementTab::Completed);
        assert!(OrderFilter::default().is_empty());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5), "$1,234.50");
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(-12.0), "-$12.00");
        assert_eq!(format_amount(f64::NAN), "");
    }
}
