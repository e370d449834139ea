//! Inventory Page
//!
//! Search, filters, sort and paging over the item grid, plus the bulk
//! actions on selected rows and Excel import/export.

use std::collections::{BTreeMap, BTreeSet};

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::browser;
use crate::components::{BulkEditModal, DeleteReasonModal, ExcelPanel, ItemTable, Modal, Pager, SortState, Spinner};
use crate::context::{use_api, use_auth, use_config};
use crate::debounce::Debouncer;
use crate::models::{BulkUpdate, Item, ItemQuery, Permission};
use crate::pagination::Pagination;
use crate::query::{keys, use_query, use_query_client};
use crate::store::{toast_error, toast_success, toast_warning, use_app_store};
use crate::undo::SharedHistory;
use crate::validate;

pub const SEARCH_PARAM: &str = "search";

/// Rows waiting for a delete reason
#[derive(Clone, Debug, PartialEq)]
pub enum PendingDelete {
    Single(Item),
    Bulk(Vec<Item>),
}

impl PendingDelete {
    pub fn items(&self) -> Vec<Item> {
        match self {
            PendingDelete::Single(item) => vec![item.clone()],
            PendingDelete::Bulk(items) => items.clone(),
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, PendingDelete::Bulk(_))
    }

    pub fn message(&self) -> String {
        match self {
            PendingDelete::Single(item) => {
                let name = item
                    .fields
                    .catalog_number
                    .as_deref()
                    .or(item.fields.description.as_deref())
                    .unwrap_or(item.id.as_str());
                format!("האם למחוק את הפריט {}?", name)
            }
            PendingDelete::Bulk(items) => format!("האם למחוק {} פריטים?", items.len()),
        }
    }
}

/// List query from the page controls
pub fn build_query(
    search: &str,
    filters: &BTreeMap<String, String>,
    sort: &SortState,
    pagination: &Pagination,
) -> ItemQuery {
    let search = search.trim();
    ItemQuery {
        search: (!search.is_empty()).then(|| search.to_string()),
        page: Some(pagination.page),
        limit: Some(pagination.per_page),
        filters: filters
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect(),
        sort_by: Some(sort.field.clone()),
        sort_order: Some(sort.order),
        ..Default::default()
    }
}

#[component]
pub fn InventoryPage() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let config = use_config();
    let auth = use_auth();
    let store = use_app_store();

    let history = SharedHistory::new(config.max_edit_history, config.max_delete_history);
    let pagination = RwSignal::new(Pagination::new(config.default_page_size as u64));
    let page_sizes: Vec<u64> = config.page_size_options.iter().map(|s| *s as u64).collect();
    let initial_search = browser::url_param(SEARCH_PARAM).unwrap_or_default();
    let search_input = RwSignal::new(initial_search.clone());
    let search = RwSignal::new(initial_search);
    let debouncer = Debouncer::new(config.filter_debounce_ms);
    let filters = RwSignal::new(BTreeMap::<String, String>::new());
    let sort = RwSignal::new(SortState::default());
    let selected = RwSignal::new(BTreeSet::<String>::new());
    let adding = RwSignal::new(false);
    let pending_delete = RwSignal::new(None::<PendingDelete>);
    let (bulk_editing, set_bulk_editing) = signal(false);
    let (deleting_all, set_deleting_all) = signal(false);

    let can_edit = Signal::derive(move || auth.has_permission(Permission::InventoryWrite));

    // Back to the first page whenever the result set changes shape
    Effect::new(move |first: Option<()>| {
        search.track();
        filters.track();
        sort.track();
        if first.is_some() {
            pagination.update(|p| p.go_to(1));
        }
    });

    let query = Memo::new(move |_| {
        search.with(|s| filters.with(|f| sort.with(|o| pagination.with(|p| build_query(s, f, o, p)))))
    });
    let list = use_query(
        move || Some(query.get()),
        keys::items_list,
        move |query: ItemQuery| {
            let api = api.get_value();
            async move { api.list_items(&query).await }
        },
    );
    let items = Signal::derive(move || list.data.with(|d| d.as_ref().map(|p| p.items.clone()).unwrap_or_default()));
    let total = Signal::derive(move || list.data.with(|d| d.as_ref().map_or(0, |p| p.total)));

    // Selection only holds rows that are still listed
    Effect::new(move |_| {
        let ids: BTreeSet<String> = items.with(|items| items.iter().map(|i| i.id.clone()).collect());
        selected.update(|s| s.retain(|id| ids.contains(id)));
    });

    let selected_items = move || {
        let ids = selected.get_untracked();
        items.with_untracked(|items| items.iter().filter(|i| ids.contains(&i.id)).cloned().collect::<Vec<_>>())
    };

    let changed = move || {
        queries.with_value(|q| {
            q.invalidate(&keys::items());
            q.invalidate(&keys::analytics());
        });
    };

    let on_delete = Callback::new(move |item: Item| pending_delete.set(Some(PendingDelete::Single(item))));
    let open_bulk_delete = move || {
        let rows = selected_items();
        if rows.is_empty() {
            toast_warning(&store, "יש לבחור פריטים למחיקה");
            return;
        }
        pending_delete.set(Some(PendingDelete::Bulk(rows)));
    };
    let open_bulk_edit = move || {
        if selected.with_untracked(BTreeSet::is_empty) {
            toast_warning(&store, "יש לבחור פריטים לעריכה");
            return;
        }
        set_bulk_editing.set(true);
    };

    let confirm_delete = Callback::new(move |reason: String| {
        let Some(target) = pending_delete.get_untracked() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            let rows = target.items();
            let result = match &target {
                PendingDelete::Single(item) => api.delete_item(&item.id, &reason).await.map(|_| ()),
                PendingDelete::Bulk(items) => {
                    let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
                    api.bulk_delete(&ids, &reason).await.map(|_| ())
                }
            };
            match result {
                Ok(()) => {
                    log::info!("[Inventory] deleted {} item(s)", rows.len());
                    history.update(|h| h.record_delete(rows, target.is_bulk()));
                    selected.set(BTreeSet::new());
                    pending_delete.set(None);
                    toast_success(&store, "המחיקה בוצעה בהצלחה (Ctrl+Z לביטול)");
                    changed();
                }
                Err(err) => toast_error(&store, &err),
            }
        });
    });

    let confirm_bulk_edit = Callback::new(move |update: BulkUpdate| {
        let ids: Vec<String> = selected.get_untracked().into_iter().collect();
        let api = api.get_value();
        spawn_local(async move {
            match api.bulk_update(&ids, &update).await {
                Ok(result) => {
                    log::info!("[Inventory] bulk update of {} item(s): {}", ids.len(), result.updated);
                    toast_success(&store, "עדכון מרובה בוצע בהצלחה");
                    selected.set(BTreeSet::new());
                    set_bulk_editing.set(false);
                    changed();
                }
                Err(err) => toast_error(&store, &err),
            }
        });
    });

    let confirm_delete_all = Callback::new(move |reason: String| {
        let api = api.get_value();
        spawn_local(async move {
            match api.delete_all_items(&reason).await {
                Ok(result) => {
                    log::warn!("[Inventory] deleted all items ({})", result.deleted);
                    toast_success(&store, format!("נמחקו {} פריטים", result.deleted));
                    selected.set(BTreeSet::new());
                    set_deleting_all.set(false);
                    changed();
                }
                Err(err) => toast_error(&store, &err),
            }
        });
    });

    let selected_count = Signal::derive(move || selected.with(BTreeSet::len));
    let count_suffix = move || {
        let n = selected_count.get();
        if n > 0 { format!(" ({})", n) } else { String::new() }
    };

    view! {
        <div class="inventory-page">
            <div class="inventory-header">
                <div class="action-buttons">
                    <Show when=move || can_edit.get()>
                        <button class="btn" on:click=move |_| adding.set(true)>"+ הוסף פריט"</button>
                        <button
                            class="btn btn-secondary"
                            disabled=move || selected_count.get() == 0
                            on:click=move |_| open_bulk_edit()
                        >
                            {move || format!("עריכה{}", count_suffix())}
                        </button>
                        <button
                            class="btn btn-danger"
                            disabled=move || selected_count.get() == 0
                            on:click=move |_| open_bulk_delete()
                        >
                            {move || format!("מחק{}", count_suffix())}
                        </button>
                    </Show>
                    <Show when=move || auth.is_super_admin()>
                        <button class="btn btn-danger" on:click=move |_| set_deleting_all.set(true)>
                            "מחק הכל"
                        </button>
                    </Show>
                    <div class="divider-vertical"></div>
                    <ExcelPanel query=query can_import=can_edit />
                </div>
                <div class="header-search">
                    <input
                        type="text"
                        class="global-search-input"
                        placeholder="חיפוש חופשי..."
                        prop:value=move || search_input.get()
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            search_input.set(value.clone());
                            debouncer.run(move || {
                                let _ = search.try_set(value);
                            });
                        }
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                debouncer.cancel();
                                search.set(search_input.get_untracked());
                            }
                        }
                    />
                </div>
            </div>

            {move || list.error_message().map(|m| view! { <div class="form-error">{m}</div> })}
            <Show
                when=move || !(list.loading.get() && list.data.with(Option::is_none))
                fallback=|| view! { <div class="loading-container"><Spinner /></div> }
            >
                <ItemTable
                    items=items
                    can_edit=can_edit
                    history=history
                    selected=selected
                    sort=sort
                    filters=filters
                    on_delete=on_delete
                    adding=adding
                    on_bulk_edit=Callback::new(move |_: ()| open_bulk_edit())
                    on_bulk_delete=Callback::new(move |_: ()| open_bulk_delete())
                />
            </Show>
            <Pager pagination=pagination total=total page_sizes=page_sizes.clone() />

            <DeleteReasonModal
                show=Signal::derive(move || pending_delete.with(Option::is_some))
                message=Signal::derive(move || pending_delete.with(|p| p.as_ref().map(PendingDelete::message).unwrap_or_default()))
                on_confirm=confirm_delete
                on_close=Callback::new(move |_: ()| pending_delete.set(None))
            />
            <BulkEditModal
                show=bulk_editing
                count=selected_count
                on_confirm=confirm_bulk_edit
                on_close=Callback::new(move |_: ()| set_bulk_editing.set(false))
            />
            <DeleteAllModal
                show=deleting_all
                total=total
                on_confirm=confirm_delete_all
                on_close=Callback::new(move |_: ()| set_deleting_all.set(false))
            />
        </div>
    }
}

/// Wiping the inventory needs the word "delete" typed out plus a reason
#[component]
fn DeleteAllModal(
    #[prop(into)] show: Signal<bool>,
    #[prop(into)] total: Signal<u64>,
    on_confirm: Callback<String>,
    on_close: Callback<()>,
) -> impl IntoView {
    let (confirmation, set_confirmation) = signal(String::new());
    let (reason, set_reason) = signal(String::new());
    let ready = move || {
        validate::delete_confirmation(&confirmation.get()) && validate::delete_reason(&reason.get())
    };

    Effect::new(move |_| {
        if show.get() {
            set_confirmation.set(String::new());
            set_reason.set(String::new());
        }
    });

    view! {
        <Modal show=show title="מחיקת כל הפריטים".to_string() on_close=on_close>
            <p class="delete-message">
                {move || format!("פעולה זו תמחק את כל {} הפריטים במלאי.", total.get())}
            </p>
            <label class="field">
                <span>"הקלד delete לאישור"</span>
                <input
                    type="text"
                    prop:value=move || confirmation.get()
                    on:input=move |ev| set_confirmation.set(event_target_value(&ev))
                />
            </label>
            <label class="field">
                <span>"סיבת המחיקה"</span>
                <textarea
                    rows="3"
                    prop:value=move || reason.get()
                    on:input=move |ev| set_reason.set(event_target_value(&ev))
                ></textarea>
            </label>
            <div class="modal-actions">
                <button
                    class="btn btn-danger"
                    disabled=move || !ready()
                    on:click=move |_| {
                        if ready() {
                            on_confirm.run(reason.get_untracked().trim().to_string());
                        }
                    }
                >
                    "מחק הכל"
                </button>
                <button class="btn" on:click=move |_| on_close.run(())>"ביטול"</button>
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemFields, SortOrder};

    fn item(id: &str, catalog: Option<&str>) -> Item {
        Item {
            id: id.to_string(),
            fields: ItemFields {
                catalog_number: catalog.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_build_query_trims_and_drops_blanks() {
        let mut filters = BTreeMap::new();
        filters.insert("manufacturer".to_string(), " Dell ".to_string());
        filters.insert("location".to_string(), "   ".to_string());
        let mut pagination = Pagination::new(25);
        pagination.go_to(2);

        let query = build_query("  ", &filters, &SortState::default(), &pagination);
        assert_eq!(query.search, None);
        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters["manufacturer"], "Dell");
        assert_eq!(query.sort_by.as_deref(), Some("updated_at"));
        assert_eq!(query.sort_order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_pending_delete_message() {
        let single = PendingDelete::Single(item("1", Some("A-100")));
        assert!(single.message().contains("A-100"));
        assert!(!single.is_bulk());

        let unnamed = PendingDelete::Single(item("42", None));
        assert!(unnamed.message().contains("42"));

        let bulk = PendingDelete::Bulk(vec![item("1", None), item("2", None)]);
        assert!(bulk.is_bulk());
        assert_eq!(bulk.items().len(), 2);
        assert!(bulk.message().contains('2'));
    }
}
