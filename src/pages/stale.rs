//! Stale Items Page
//!
//! Items not updated for a number of days, editable in place.

use std::collections::BTreeSet;

use leptos::prelude::*;

use crate::components::{ItemTable, Pager, Spinner};
use crate::context::{use_api, use_auth, use_config};
use crate::models::{ItemPage, Permission};
use crate::pagination::Pagination;
use crate::query::{keys, use_query};
use crate::undo::SharedHistory;

pub const DEFAULT_STALE_DAYS: u32 = 30;

#[component]
pub fn StalePage() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let config = use_config();
    let auth = use_auth();
    let history = SharedHistory::new(config.max_edit_history, config.max_delete_history);
    let pagination = RwSignal::new(Pagination::new(config.default_page_size as u64));
    let page_sizes: Vec<u64> = config.page_size_options.iter().map(|s| *s as u64).collect();
    let (days, set_days) = signal(DEFAULT_STALE_DAYS);
    let selected = RwSignal::new(BTreeSet::<String>::new());

    let stale = use_query(
        move || {
            let p = pagination.get();
            Some((days.get(), p.page, p.per_page))
        },
        |(days, page, limit): &(u32, u64, u64)| keys::stale_items(*days, *page, *limit),
        move |(days, page, limit): (u32, u64, u64)| {
            let api = api.get_value();
            async move { api.stale_items(days, page, limit).await }
        },
    );

    let items = Signal::derive(move || stale.data.with(|d| d.as_ref().map(|p| p.items.clone()).unwrap_or_default()));
    let total = Signal::derive(move || stale.data.with(|d| d.as_ref().map_or(0, |p: &ItemPage| p.total)));
    let can_edit = Signal::derive(move || auth.has_permission(Permission::InventoryWrite));

    view! {
        <div class="stale-items-page">
            <div class="stale-items-header">
                <div class="days-filter">
                    <label>"הצג פריטים שלא עודכנו למעלה מ-"</label>
                    <input
                        type="number"
                        min="0"
                        class="days-input"
                        prop:value=move || days.get().to_string()
                        on:change=move |ev| {
                            if let Ok(value) = event_target_value(&ev).trim().parse() {
                                set_days.set(value);
                                pagination.update(|p| p.go_to(1));
                            }
                        }
                    />
                    <span>"ימים"</span>
                </div>
            </div>
            {move || stale.error_message().map(|m| view! { <div class="form-error">{m}</div> })}
            <Show when=move || !(stale.loading.get() && stale.data.with(Option::is_none)) fallback=|| view! { <Spinner /> }>
                <ItemTable items=items can_edit=can_edit history=history selected=selected />
            </Show>
            <Pager pagination=pagination total=total page_sizes=page_sizes.clone() />
        </div>
    }
}
