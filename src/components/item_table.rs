//! Item Table Component
//!
//! The inventory grid. Cells are selected with the mouse (ctrl-drag for
//! several), navigated with the keyboard, copied with Ctrl+C and edited in
//! place. Saved edits go into the undo history shared with the page, which
//! also records deletes there. Column widths can be dragged, and a
//! right-click opens the copy / bulk action menu.

use std::collections::{BTreeMap, BTreeSet};

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_grid::{
    bind_global_keydown, bind_global_mousedown_clear, bind_global_mouseup, create_grid_signals,
    make_on_cell_mousedown, make_on_cell_mouseenter, CellRef, GridCommand, Overflow,
};

use crate::api::{Api, ApiError, ErrorKind, UndoRecord};
use crate::browser;
use crate::column_widths::{ColumnWidths, ResizeDrag};
use crate::components::{toggle_menu, ContextMenu, FloatingToolbar, MenuPosition, SelectionIndicator};
use crate::context::{use_api, use_auth, use_config, AuthContext};
use crate::debounce::Debouncer;
use crate::editing::{CellEdit, CellEditor};
use crate::format::{format_cell_value, format_date, truncate_text, DEFAULT_TRUNCATE};
use crate::models::{ColumnType, Item, ItemField, ItemFields, SortOrder};
use crate::query::{keys, use_query_client, QueryClient};
use crate::store::{toast_error, toast_info, toast_success, toast_warning, use_app_store, AppStore};
use crate::undo::{SharedHistory, UndoOp};

// ========================
// Sorting / New rows
// ========================

/// Sorted column and direction; newest changes first by default
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: "updated_at".to_string(),
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    /// Clicking the sorted column flips it; another column starts ascending
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.order = self.order.toggled();
        } else {
            self.field = field.to_string();
            self.order = SortOrder::Asc;
        }
    }

    pub fn indicator(&self, field: &str) -> &'static str {
        match (self.field == field, self.order) {
            (false, _) => "",
            (true, SortOrder::Asc) => " ▲",
            (true, SortOrder::Desc) => " ▼",
        }
    }
}

/// Message for an inline-added row that cannot be sent yet
pub fn new_item_problem(fields: &ItemFields) -> Option<&'static str> {
    let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    if filled(&fields.catalog_number) && filled(&fields.description) {
        None
    } else {
        Some("חובה למלא מק\"ט ותיאור")
    }
}

fn column_keys() -> [&'static str; 11] {
    ItemField::COLUMNS.map(ItemField::key)
}

// ========================
// Backend actions
// ========================

#[derive(Clone, Copy)]
struct TableActions {
    api: StoredValue<Api, LocalStorage>,
    queries: StoredValue<QueryClient, LocalStorage>,
    store: AppStore,
    auth: AuthContext,
    history: SharedHistory,
}

async fn apply(api: &Api, op: UndoOp) -> Result<(), ApiError> {
    match op {
        UndoOp::WriteField {
            item_id,
            field,
            value,
            is_undo,
        } => api
            .update_item(&item_id, &field, &value, is_undo)
            .await
            .map(|_| ()),
        UndoOp::RestoreItems(items) => {
            let restored = api.restore_items(&items).await;
            if restored.is_empty() && !items.is_empty() {
                return Err(ApiError::new(ErrorKind::Server, "no item could be restored"));
            }
            Ok(())
        }
    }
}

impl TableActions {
    fn new(history: SharedHistory) -> Self {
        Self {
            api: StoredValue::new_local(use_api()),
            queries: StoredValue::new_local(use_query_client()),
            store: use_app_store(),
            auth: use_auth(),
            history,
        }
    }

    fn refresh(&self) {
        self.queries.with_value(|q| q.invalidate(&keys::items()));
    }

    fn save_edit(self, edit: CellEdit) {
        let api = self.api.get_value();
        spawn_local(async move {
            let field = edit.field.key();
            match api.update_item(&edit.item_id, field, &edit.new_value, false).await {
                Ok(_) => {
                    self.history.update(|h| {
                        h.record_edit(&edit.item_id, field, &edit.new_value, &edit.previous_value)
                    });
                    log::info!("[Table] {} {} updated", edit.item_id, field);
                    self.refresh();
                }
                Err(err) => {
                    log::error!("[Table] update of {} {} failed: {}", edit.item_id, field, err);
                    toast_error(&self.store, &err);
                }
            }
        });
    }

    fn undo(self) {
        let Some((op, undone)) = self.history.update(|h| h.undo()).flatten() else {
            log::debug!("[Undo] nothing to undo");
            return;
        };
        let api = self.api.get_value();
        spawn_local(async move {
            if let Err(err) = apply(&api, op).await {
                log::error!("[Undo] failed: {}", err);
                toast_error(&self.store, &err);
                return;
            }
            let record = UndoRecord {
                user: self.auth.username(),
                actor_role: self.auth.role(),
                resource_id: undone.resource_id(),
                changes: undone.audit_changes(),
                details: None,
            };
            if let Err(err) = api.record_undo(&record).await {
                log::warn!("[Undo] audit entry not written: {}", err);
            }
            self.refresh();
            self.queries.with_value(|q| q.invalidate(&keys::logs()));
            toast_success(&self.store, "הפעולה בוטלה");
        });
    }

    fn redo(self) {
        let Some(op) = self.history.update(|h| h.redo()).flatten() else {
            log::debug!("[Redo] nothing to redo");
            return;
        };
        let api = self.api.get_value();
        spawn_local(async move {
            match apply(&api, op).await {
                Ok(()) => {
                    self.refresh();
                    toast_success(&self.store, "הפעולה בוצעה מחדש");
                }
                Err(err) => {
                    log::error!("[Redo] failed: {}", err);
                    toast_error(&self.store, &err);
                }
            }
        });
    }

    fn copy(self, text: String, count: usize) {
        spawn_local(async move {
            match browser::copy_to_clipboard(&text).await {
                Ok(()) => toast_success(&self.store, format!("הועתקו {} תאים", count)),
                Err(err) => {
                    log::warn!("[Table] clipboard write failed: {}", err);
                    toast_warning(&self.store, "ההעתקה נכשלה");
                }
            }
        });
    }

    fn create(self, fields: ItemFields, on_created: impl FnOnce() + 'static) {
        let api = self.api.get_value();
        spawn_local(async move {
            match api.create_item(&fields, false).await {
                Ok(item) => {
                    log::info!("[Table] created item {}", item.id);
                    toast_success(&self.store, "הפריט נוסף");
                    self.refresh();
                    on_created();
                }
                Err(err) => toast_error(&self.store, &err),
            }
        });
    }
}

// ========================
// Components
// ========================

#[component]
pub fn ItemTable(
    #[prop(into)] items: Signal<Vec<Item>>,
    #[prop(into)] can_edit: Signal<bool>,
    history: SharedHistory,
    /// Row checkboxes
    #[prop(optional)]
    selected: Option<RwSignal<BTreeSet<String>>>,
    #[prop(optional)] sort: Option<RwSignal<SortState>>,
    /// Column filter row, keyed by backend field name
    #[prop(optional)]
    filters: Option<RwSignal<BTreeMap<String, String>>>,
    #[prop(optional, into)] on_delete: Option<Callback<Item>>,
    /// Inline add row toggle
    #[prop(optional)]
    adding: Option<RwSignal<bool>>,
    /// Context menu row actions on the checked rows
    #[prop(optional)]
    on_bulk_edit: Option<Callback<()>>,
    #[prop(optional)] on_bulk_delete: Option<Callback<()>>,
) -> impl IntoView {
    let config = use_config();
    let target_sites = StoredValue::new(config.target_sites.clone());
    let debounce_ms = config.filter_debounce_ms;
    let actions = TableActions::new(history);
    let grid = create_grid_signals();
    let editor = RwSignal::new(CellEditor::new());
    let editing_cell = Memo::new(move |_| {
        editor.with(|e| e.cell().map(|c| (c.item_id.clone(), c.field)))
    });

    let row_ids = move || {
        items.with_untracked(|items| items.iter().map(|i| i.id.clone()).collect::<Vec<_>>())
    };
    let display_value = move |cell: &CellRef| -> String {
        let Some(field) = ItemField::from_key(&cell.field) else {
            return String::new();
        };
        items.with_untracked(|items| {
            items
                .iter()
                .find(|i| i.id == cell.row_id)
                .map(|i| format_cell_value(&i.fields.value(field)))
                .unwrap_or_default()
        })
    };
    let current_cell = move || {
        grid.focused.get_untracked().or_else(|| {
            grid.selection
                .with_untracked(|s| s.cells().first().map(|c| c.cell.clone()))
        })
    };

    let start_edit = move |cell: &CellRef| {
        if !can_edit.get_untracked() {
            return;
        }
        let Some(field) = ItemField::from_key(&cell.field) else {
            return;
        };
        let current = items.with_untracked(|items| {
            items
                .iter()
                .find(|i| i.id == cell.row_id)
                .map(|i| i.fields.text(field).map(str::to_string))
        });
        let Some(current) = current else {
            return;
        };
        let started = editor
            .try_update(|e| e.start(&cell.row_id, field, current.as_deref()))
            .unwrap_or(false);
        if !started {
            toast_info(&actions.store, format!("לא ניתן לערוך את השדה {}", field.label()));
        }
    };
    let save = move || {
        if let Some(edit) = editor.try_update(|e| e.save()).flatten() {
            actions.save_edit(edit);
        }
    };

    let copy_cells = move || {
        let count = grid.selection.with_untracked(|s| s.len());
        actions.copy(grid.copy_text(), count);
    };

    bind_global_mouseup(grid);
    bind_global_mousedown_clear(grid);
    bind_global_keydown(
        grid,
        move || editor.with_untracked(|e| e.is_active()),
        move |command| match command {
            GridCommand::Copy => copy_cells(),
            GridCommand::Undo if can_edit.get_untracked() => actions.undo(),
            GridCommand::Redo if can_edit.get_untracked() => actions.redo(),
            GridCommand::Move { rows, cols, extend } => {
                grid.navigate(&row_ids(), &column_keys(), rows, cols, extend, display_value);
            }
            GridCommand::StartEdit => {
                if let Some(cell) = current_cell() {
                    start_edit(&cell);
                }
            }
            GridCommand::Save => save(),
            GridCommand::SaveAndMove { rows, cols } => {
                save();
                let overflow = if cols != 0 { Overflow::Wrap } else { Overflow::Clamp };
                grid.move_by(&row_ids(), &column_keys(), rows, cols, overflow);
            }
            GridCommand::Cancel => editor.update(|e| e.cancel()),
            GridCommand::ClearSelection => grid.clear(),
            _ => {}
        },
    );

    let on_commit = Callback::new(move |_: ()| save());

    let widths = RwSignal::new(ColumnWidths::load());
    let resizing = RwSignal::new(None::<ResizeDrag>);
    bind_column_resize(widths, resizing);

    let menu = RwSignal::new(None::<MenuPosition>);
    let on_context_menu = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        menu.update(|m| *m = toggle_menu(*m, ev.client_x(), ev.client_y()));
    };
    let close_menu = move |ev: leptos::ev::MouseEvent| {
        if ev.button() == 0 && menu.with_untracked(Option::is_some) {
            menu.set(None);
        }
    };
    let cell_count = Signal::derive(move || grid.selection.with(|s| s.len()));
    let row_count = Signal::derive(move || selected.map_or(0, |s| s.with(BTreeSet::len)));

    let render_cell = move |item: &Item, field: ItemField| {
        let row_id = item.id.clone();
        let cell = CellRef::new(row_id.clone(), field.key());
        let display = format_cell_value(&item.fields.value(field));
        let shown = match field.column_type() {
            ColumnType::Date => format_date(item.fields.text(field)),
            _ => truncate_text(&display, DEFAULT_TRUNCATE),
        };
        let chips: Vec<String> = item
            .fields
            .project_allocations
            .iter()
            .map(|(project, qty)| format!("{}: {}", project, qty))
            .collect();

        let class = {
            let cell = cell.clone();
            move || {
                let mut class = String::from("cell");
                if field.is_frozen() {
                    class.push_str(" frozen");
                }
                if field.is_immutable() {
                    class.push_str(" readonly");
                }
                if grid.is_selected(&cell) {
                    class.push_str(" selected");
                }
                if grid.is_focused(&cell) {
                    class.push_str(" focused");
                }
                class
            }
        };
        let is_editing = move || {
            editing_cell.with(|c| c.as_ref().is_some_and(|(id, f)| *id == row_id && *f == field))
        };
        let on_click = {
            let cell = cell.clone();
            move |_| grid.focus(cell.clone())
        };
        let on_dblclick = {
            let cell = cell.clone();
            move |_| {
                grid.set_focus(Some(cell.clone()));
                start_edit(&cell);
            }
        };

        view! {
            <td
                class=class
                title=display.clone()
                on:mousedown=make_on_cell_mousedown(grid, cell.clone(), display.clone())
                on:mouseenter=make_on_cell_mouseenter(grid, cell.clone(), display.clone())
                on:click=on_click
                on:dblclick=on_dblclick
            >
                {move || {
                    if is_editing() {
                        view! {
                            <CellInput editor=editor field=field target_sites=target_sites on_commit=on_commit />
                        }
                            .into_any()
                    } else if field.column_type() == ColumnType::Tags {
                        chips
                            .iter()
                            .map(|chip| view! { <span class="chip">{chip.clone()}</span> })
                            .collect_view()
                            .into_any()
                    } else {
                        shown.clone().into_any()
                    }
                }}
            </td>
        }
    };

    let render_row = move |item: Item| {
        let check = selected.map(|selected| {
            let id = item.id.clone();
            let checked = {
                let id = id.clone();
                move || selected.with(|s| s.contains(&id))
            };
            view! {
                <td class="col-check" data-grid-keep="">
                    <input
                        type="checkbox"
                        prop:checked=checked
                        on:change=move |_| {
                            selected.update(|s| {
                                if !s.remove(&id) {
                                    s.insert(id.clone());
                                }
                            })
                        }
                    />
                </td>
            }
        });
        let cells = ItemField::COLUMNS
            .into_iter()
            .map(|field| render_cell(&item, field))
            .collect_view();
        let delete = on_delete.map(|on_delete| {
            let item = item.clone();
            view! {
                <td class="col-actions">
                    <button
                        class="btn-icon"
                        title="מחק"
                        disabled=move || !can_edit.get()
                        on:click=move |_| on_delete.run(item.clone())
                    >
                        "🗑"
                    </button>
                </td>
            }
        });
        view! { <tr>{check}{cells}{delete}</tr> }
    };

    let all_checked = move || {
        selected.is_some_and(|selected| {
            items.with(|items| {
                !items.is_empty() && selected.with(|s| items.iter().all(|i| s.contains(&i.id)))
            })
        })
    };
    let toggle_all = move |_: leptos::ev::Event| {
        let Some(selected) = selected else {
            return;
        };
        let ids = row_ids();
        let all = all_checked();
        selected.update(|s| {
            for id in ids {
                if all {
                    s.remove(&id);
                } else {
                    s.insert(id);
                }
            }
        });
    };

    let resizer = move |key: &'static str| {
        view! {
            <span
                class="col-resizer"
                title="גרירה לשינוי רוחב, לחיצה כפולה לאיפוס"
                on:mousedown=move |ev: leptos::ev::MouseEvent| {
                    if ev.button() != 0 {
                        return;
                    }
                    ev.prevent_default();
                    ev.stop_propagation();
                    let start_width = widths.with_untracked(|w| w.width(key));
                    resizing.set(Some(ResizeDrag {
                        field: key.to_string(),
                        start_x: ev.client_x(),
                        start_width,
                    }));
                }
                on:click=|ev: leptos::ev::MouseEvent| ev.stop_propagation()
                on:dblclick=move |ev: leptos::ev::MouseEvent| {
                    ev.stop_propagation();
                    if widths.with_untracked(|w| w.is_customized(key)) {
                        widths.update(|w| w.reset(key));
                        widths.with_untracked(ColumnWidths::save);
                    }
                }
            ></span>
        }
    };

    let header = move |field: ItemField| {
        let key = field.key();
        let class = if field.is_frozen() { "frozen" } else { "" };
        let width = move || format!("{}px", widths.with(|w| w.width(key)));
        match sort {
            Some(sort) => view! {
                <th
                    class=format!("sortable {}", class)
                    style:width=width
                    on:click=move |_| sort.update(|s| s.toggle(key))
                >
                    {field.label()}
                    {move || sort.with(|s| s.indicator(key))}
                    {resizer(key)}
                </th>
            }
                .into_any(),
            None => view! {
                <th class=class style:width=width>
                    {field.label()}
                    {resizer(key)}
                </th>
            }
                .into_any(),
        }
    };

    let extra_cols = selected.is_some() as usize + on_delete.is_some() as usize;
    let colspan = ItemField::COLUMNS.len() + extra_cols;

    let table_class = move || {
        if resizing.with(Option::is_some) { "item-table resizing" } else { "item-table" }
    };

    view! {
        <div class="table-wrap" on:contextmenu=on_context_menu on:mousedown=close_menu>
            <table class=table_class>
                <thead>
                    <tr>
                        {selected.map(|_| view! {
                            <th class="col-check" data-grid-keep="">
                                <input type="checkbox" prop:checked=all_checked on:change=toggle_all />
                            </th>
                        })}
                        {ItemField::COLUMNS.into_iter().map(header).collect_view()}
                        {on_delete.map(|_| view! { <th class="col-actions"></th> })}
                    </tr>
                    {filters.map(|filters| view! {
                        <FilterRow
                            filters=filters
                            debounce_ms=debounce_ms
                            leading=selected.is_some()
                            trailing=on_delete.is_some()
                        />
                    })}
                </thead>
                <tbody>
                    {adding.map(|adding| view! {
                        <Show when=move || adding.get() && can_edit.get()>
                            <AddItemRow
                                target_sites=target_sites
                                leading=selected.is_some()
                                trailing=on_delete.is_some()
                                on_save=Callback::new(move |fields: ItemFields| {
                                    actions.create(fields, move || adding.set(false));
                                })
                                on_cancel=Callback::new(move |_: ()| adding.set(false))
                            />
                        </Show>
                    })}
                    <For
                        each=move || items.get()
                        key=|item| serde_json::to_string(item).unwrap_or_else(|_| item.id.clone())
                        children=render_row
                    />
                    <Show when=move || items.with(Vec::is_empty)>
                        <tr class="empty-row">
                            <td colspan=colspan.to_string()>"לא נמצאו פריטים"</td>
                        </tr>
                    </Show>
                </tbody>
            </table>
        </div>
        <Show when=move || can_edit.get()>
            <FloatingToolbar
                can_undo=Signal::derive(move || history.can_undo())
                can_redo=Signal::derive(move || history.can_redo())
                on_undo=Callback::new(move |_: ()| actions.undo())
                on_redo=Callback::new(move |_: ()| actions.redo())
            />
        </Show>
        <SelectionIndicator count=cell_count />
        <ContextMenu
            position=menu
            cell_count=cell_count
            row_count=row_count
            can_edit=can_edit
            on_copy=Callback::new(move |_: ()| copy_cells())
            on_edit=on_bulk_edit
            on_delete=on_bulk_delete
        />
    }
}

/// Track a column-edge drag on the window and persist the width on release
fn bind_column_resize(widths: RwSignal<ColumnWidths>, resizing: RwSignal<Option<ResizeDrag>>) {
    let on_move = window_event_listener(leptos::ev::mousemove, move |ev| {
        let width = resizing.with_untracked(|r| r.as_ref().map(|d| (d.field.clone(), d.width_at(ev.client_x()))));
        if let Some((field, width)) = width {
            widths.update(|w| w.set(&field, width));
        }
    });
    let on_up = window_event_listener(leptos::ev::mouseup, move |_| {
        if resizing.with_untracked(Option::is_some) {
            resizing.set(None);
            widths.with_untracked(ColumnWidths::save);
        }
    });
    on_cleanup(move || {
        on_move.remove();
        on_up.remove();
    });
}

/// In-cell editor: a select for target sites, otherwise an input typed
/// after the column
#[component]
fn CellInput(
    editor: RwSignal<CellEditor>,
    field: ItemField,
    target_sites: StoredValue<Vec<String>>,
    on_commit: Callback<()>,
) -> impl IntoView {
    let input_ref = NodeRef::<html::Input>::new();
    let select_ref = NodeRef::<html::Select>::new();
    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
            input.select();
        }
    });
    Effect::new(move |_| {
        if let Some(select) = select_ref.get() {
            let _ = select.focus();
        }
    });

    let set = move |ev: leptos::ev::Event| editor.update(|e| e.set_value(event_target_value(&ev)));

    match field.column_type() {
        ColumnType::Select => view! {
            <select
                node_ref=select_ref
                class="cell-input"
                on:change=move |ev| {
                    set(ev);
                    on_commit.run(());
                }
                on:blur=move |_| on_commit.run(())
            >
                <option value="">"-"</option>
                {target_sites
                    .get_value()
                    .into_iter()
                    .map(|site| {
                        let current = site.clone();
                        view! {
                            <option
                                value=site.clone()
                                selected=move || editor.with(|e| e.value() == current)
                            >
                                {site.clone()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        }
            .into_any(),
        other => {
            let kind = match other {
                ColumnType::Number => "number",
                ColumnType::Date => "date",
                _ => "text",
            };
            view! {
                <input
                    node_ref=input_ref
                    class="cell-input"
                    type=kind
                    prop:value=move || editor.with(|e| e.value().to_string())
                    on:input=set
                    on:blur=move |_| on_commit.run(())
                />
            }
                .into_any()
        }
    }
}

/// Per-column filter inputs, written to `filters` after a pause in typing
#[component]
fn FilterRow(
    filters: RwSignal<BTreeMap<String, String>>,
    debounce_ms: u64,
    leading: bool,
    trailing: bool,
) -> impl IntoView {
    let inputs = ItemField::COLUMNS
        .into_iter()
        .map(|field| {
            if !field.is_filterable() {
                return view! { <th></th> }.into_any();
            }
            let debouncer = Debouncer::new(debounce_ms);
            let key = field.key();
            view! {
                <th class="filter-cell">
                    <input
                        type="text"
                        class="filter-input"
                        placeholder="סינון"
                        prop:value=move || filters.with(|f| f.get(key).cloned().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev).trim().to_string();
                            debouncer.run(move || {
                                let _ = filters.try_update(|f| {
                                    if value.is_empty() {
                                        f.remove(key);
                                    } else {
                                        f.insert(key.to_string(), value);
                                    }
                                });
                            });
                        }
                    />
                </th>
            }
                .into_any()
        })
        .collect_view();

    view! {
        <tr class="filter-row">
            {leading.then(|| view! { <th></th> })}
            {inputs}
            {trailing.then(|| view! { <th></th> })}
        </tr>
    }
}

/// Inline row for a new item; catalog number and description are required
#[component]
fn AddItemRow(
    target_sites: StoredValue<Vec<String>>,
    leading: bool,
    trailing: bool,
    on_save: Callback<ItemFields>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let store = use_app_store();
    let fields = RwSignal::new(ItemFields::default());

    let save = move || {
        let current = fields.get_untracked();
        if let Some(problem) = new_item_problem(&current) {
            toast_warning(&store, problem);
            return;
        }
        on_save.run(current);
    };

    let inputs = ItemField::COLUMNS
        .into_iter()
        .map(|field| {
            let value = move || fields.with(|f| f.text(field).unwrap_or_default().to_string());
            let set = move |ev: leptos::ev::Event| {
                let text = event_target_value(&ev);
                fields.update(|f| f.set_text(field, &text));
            };
            match field.column_type() {
                ColumnType::Tags => view! { <td></td> }.into_any(),
                ColumnType::Select => view! {
                    <td>
                        <select on:change=set>
                            <option value="">"-"</option>
                            {target_sites
                                .get_value()
                                .into_iter()
                                .map(|site| view! { <option value=site.clone()>{site.clone()}</option> })
                                .collect_view()}
                        </select>
                    </td>
                }
                    .into_any(),
                other => {
                    let kind = match other {
                        ColumnType::Number => "number",
                        ColumnType::Date => "date",
                        _ => "text",
                    };
                    view! {
                        <td>
                            <input
                                type=kind
                                placeholder=field.label()
                                prop:value=value
                                on:input=set
                                on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                                    "Enter" => save(),
                                    "Escape" => on_cancel.run(()),
                                    _ => {}
                                }
                            />
                        </td>
                    }
                        .into_any()
                }
            }
        })
        .collect_view();

    view! {
        <tr class="add-row" data-grid-keep="">
            {leading.then(|| view! { <td></td> })}
            {inputs}
            {trailing.then(|| view! {
                <td class="col-actions">
                    <button class="btn-icon" title="שמור" on:click=move |_| save()>"✔"</button>
                    <button class="btn-icon" title="ביטול" on:click=move |_| on_cancel.run(())>"✖"</button>
                </td>
            })}
        </tr>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_toggle() {
        let mut sort = SortState::default();
        assert_eq!(sort.indicator("updated_at"), " ▼");
        sort.toggle("updated_at");
        assert_eq!(sort.order, SortOrder::Asc);
        sort.toggle("description");
        assert_eq!(sort.field, "description");
        assert_eq!(sort.order, SortOrder::Asc);
        assert_eq!(sort.indicator("updated_at"), "");
        sort.toggle("description");
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_new_item_needs_catalog_and_description() {
        let mut fields = ItemFields::default();
        assert!(new_item_problem(&fields).is_some());
        fields.catalog_number = Some("C-1".into());
        fields.description = Some("   ".into());
        assert!(new_item_problem(&fields).is_some());
        fields.description = Some("Cable".into());
        assert_eq!(new_item_problem(&fields), None);
    }
}
