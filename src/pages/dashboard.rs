//! Dashboard Page
//!
//! Headline counts, distribution charts, recent activity and a per-item
//! allocation lookup.

use leptos::prelude::*;

use crate::components::{BarChart, ChartCard, Spinner, StatCard, TimelineChart};
use crate::context::use_api;
use crate::format::format_number;
use crate::models::{ActivityStats, DashboardStats, NamedValue};
use crate::query::{keys, use_query};

pub const ACTIVITY_RANGES: [(u32, &str); 4] = [
    (7, "שבוע אחרון"),
    (14, "שבועיים"),
    (30, "חודש אחרון"),
    (90, "3 חודשים"),
];

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let stats = use_query(
        || Some(()),
        |_: &()| keys::dashboard(),
        move |_: ()| {
            let api = api.get_value();
            async move { api.dashboard_stats().await }
        },
    );

    let stat = move |pick: fn(&DashboardStats) -> u64| {
        Signal::derive(move || {
            stats
                .data
                .with(|d| d.as_ref().map(pick).unwrap_or(0))
                .to_string()
        })
    };
    let series = move |pick: fn(&DashboardStats) -> Vec<NamedValue>| {
        Signal::derive(move || stats.data.with(|d| d.as_ref().map(pick).unwrap_or_default()))
    };

    view! {
        <div class="dashboard-page">
            {move || {
                if stats.loading.get() && stats.data.with(Option::is_none) {
                    return view! { <div class="loading-container"><Spinner /></div> }.into_any();
                }
                if let Some(message) = stats.error_message() {
                    return view! { <div class="loading-container form-error">{message}</div> }.into_any();
                }
                view! {
                    <div class="stats-grid">
                        <StatCard title="סה\"כ פריטים" value=stat(|s| s.total_items) color="blue" />
                        <StatCard title="שריונים פעילים" value=stat(|s| s.active_allocations) color="green" />
                        <StatCard title="כמות ציוד סריאלי" value=stat(|s| s.serial_equipment) color="purple" icon="#" />
                        <StatCard title="כמות ציוד נלווה" value=stat(|s| s.non_serial_equipment) color="amber" />
                    </div>
                    <div class="charts-grid">
                        <ChartCard title="התפלגות לפי פרויקט">
                            <BarChart data=series(|s| s.projects.clone()) />
                        </ChartCard>
                        <ChartCard title="התפלגות לפי אתר יעד">
                            <BarChart data=series(|s| s.target_sites.clone()) />
                        </ChartCard>
                    </div>
                    <div class="charts-grid second-row">
                        <ChartCard title="חיפוש התפלגות לפי מק\"ט">
                            <ItemSearchChart />
                        </ChartCard>
                        <ChartCard title="פעילות אחרונה">
                            <ActivityCard />
                        </ChartCard>
                    </div>
                    <div class="charts-grid third-row">
                        <ChartCard title="התפלגות לפי יצרן">
                            <BarChart data=series(|s| s.manufacturers.clone()) />
                        </ChartCard>
                        <ChartCard title="התפלגות לפי מיקום">
                            <BarChart data=series(|s| s.locations.clone()) />
                        </ChartCard>
                    </div>
                    <ChartCard title="ציר זמן פעילות">
                        <ActivityTimeline />
                    </ChartCard>
                }
                    .into_any()
            }}
        </div>
    }
}

/// Created/updated/deleted counts over a selectable range
#[component]
fn ActivityCard() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let (days, set_days) = signal(ACTIVITY_RANGES[0].0);
    let activity = use_query(
        move || Some(days.get()),
        |days: &u32| keys::activity_stats(*days),
        move |days: u32| {
            let api = api.get_value();
            async move { api.activity_stats(days).await }
        },
    );
    let count = move |pick: fn(&ActivityStats) -> u64| {
        move || format_number(activity.data.with(|d| d.as_ref().map(pick).unwrap_or(0)) as f64)
    };

    view! {
        <div class="activity-card">
            <select
                class="modern-select"
                on:change=move |ev| {
                    if let Ok(value) = event_target_value(&ev).parse() {
                        set_days.set(value);
                    }
                }
            >
                {ACTIVITY_RANGES
                    .into_iter()
                    .map(|(value, label)| view! {
                        <option value=value.to_string() selected=move || days.get() == value>{label}</option>
                    })
                    .collect_view()}
            </select>
            <div class="activity-stats-display">
                <div class="activity-item">
                    <span class="activity-icon green"></span>
                    <span class="activity-count">{count(|a| a.created)}</span>
                    <span class="activity-label">"פריטים נוצרו"</span>
                </div>
                <div class="activity-item">
                    <span class="activity-icon amber"></span>
                    <span class="activity-count">{count(|a| a.updated)}</span>
                    <span class="activity-label">"פריטים עודכנו"</span>
                </div>
                <div class="activity-item">
                    <span class="activity-icon red"></span>
                    <span class="activity-count">{count(|a| a.deleted)}</span>
                    <span class="activity-label">"פריטים נמחקו"</span>
                </div>
            </div>
        </div>
    }
}

/// Where the units of one catalog number are allocated
#[component]
fn ItemSearchChart() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let (input, set_input) = signal(String::new());
    let (catalog, set_catalog) = signal(None::<String>);
    let result = use_query(
        move || catalog.get(),
        |catalog: &String| keys::item_project_stats(catalog),
        move |catalog: String| {
            let api = api.get_value();
            async move { api.item_project_stats(&catalog).await }
        },
    );
    let search = move || {
        let value = input.get_untracked().trim().to_string();
        if !value.is_empty() {
            set_catalog.set(Some(value));
        }
    };

    view! {
        <div class="item-search-chart">
            <div class="item-search-controls">
                <input
                    type="text"
                    placeholder="חפש לפי מק\"ט"
                    prop:value=move || input.get()
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            search();
                        }
                    }
                />
                <button class="btn btn-primary" on:click=move |_| search()>"חפש"</button>
            </div>
            {move || {
                if catalog.with(Option::is_none) {
                    return view! { <div class="no-data">"חפש מק\"ט כדי לראות התפלגות"</div> }.into_any();
                }
                if result.loading.get() {
                    return view! { <Spinner /> }.into_any();
                }
                if let Some(message) = result.error_message() {
                    return view! { <div class="no-data">{message}</div> }.into_any();
                }
                let data = Signal::derive(move || result.data.get().unwrap_or_default());
                view! { <BarChart data=data empty_text="אין שריונים למק\"ט זה" /> }.into_any()
            }}
        </div>
    }
}

/// Per-day activity, optionally for one catalog number
#[component]
fn ActivityTimeline() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let (days, set_days) = signal(30u32);
    let (input, set_input) = signal(String::new());
    let (catalog, set_catalog) = signal(None::<String>);
    let timeline = use_query(
        move || Some((days.get(), catalog.get())),
        |(days, catalog): &(u32, Option<String>)| keys::timeline(*days, catalog.as_deref()),
        move |(days, catalog): (u32, Option<String>)| {
            let api = api.get_value();
            async move { api.activity_timeline(days, catalog.as_deref()).await }
        },
    );
    let apply = move || {
        let value = input.get_untracked().trim().to_string();
        set_catalog.set((!value.is_empty()).then_some(value));
    };

    view! {
        <div class="activity-timeline">
            <div class="item-search-controls">
                <input
                    type="text"
                    placeholder="סנן לפי מק\"ט (השאר ריק לכל הפעילות)"
                    prop:value=move || input.get()
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            apply();
                        }
                    }
                />
                <button class="btn btn-primary" on:click=move |_| apply()>"סנן"</button>
                <Show when=move || catalog.with(Option::is_some)>
                    <button
                        class="btn"
                        on:click=move |_| {
                            set_input.set(String::new());
                            set_catalog.set(None);
                        }
                    >
                        "נקה"
                    </button>
                </Show>
                <select
                    class="modern-select"
                    on:change=move |ev| {
                        if let Ok(value) = event_target_value(&ev).parse() {
                            set_days.set(value);
                        }
                    }
                >
                    {ACTIVITY_RANGES
                        .into_iter()
                        .map(|(value, label)| view! {
                            <option value=value.to_string() selected=move || days.get() == value>{label}</option>
                        })
                        .collect_view()}
                </select>
            </div>
            <TimelineChart points=Signal::derive(move || timeline.data.get().unwrap_or_default()) />
        </div>
    }
}
