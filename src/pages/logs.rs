//! Activity Log Page
//!
//! Item activity as a timeline, filtered by action and free text.

use leptos::prelude::*;

use crate::api::ActivityQuery;
use crate::components::{LogTimeline, Pager, Spinner};
use crate::context::use_api;
use crate::models::{action_label, AuditAction};
use crate::pagination::Pagination;
use crate::query::{keys, use_query};

const LOGS_PER_PAGE: u64 = 50;

/// Applied filters; the form edits a draft until "filter" is pressed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogFilter {
    pub action: String,
    pub search: String,
}

impl LogFilter {
    pub fn to_query(&self, pagination: &Pagination) -> ActivityQuery {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        ActivityQuery {
            page: Some(pagination.page),
            limit: Some(pagination.per_page),
            action: non_empty(&self.action),
            search: non_empty(&self.search),
        }
    }
}

#[component]
pub fn LogsPage() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let pagination = RwSignal::new(Pagination::new(LOGS_PER_PAGE));
    let draft = RwSignal::new(LogFilter::default());
    let applied = RwSignal::new(LogFilter::default());

    let logs = use_query(
        move || Some(applied.with(|f| f.to_query(&pagination.get()))),
        keys::activity_logs,
        move |query: ActivityQuery| {
            let api = api.get_value();
            async move { api.activity_logs(&query).await }
        },
    );

    let apply = move || {
        applied.set(draft.get_untracked());
        pagination.update(|p| p.go_to(1));
    };
    let clear = move || {
        draft.set(LogFilter::default());
        applied.set(LogFilter::default());
        pagination.update(|p| p.go_to(1));
    };

    let entries = Signal::derive(move || logs.data.with(|d| d.as_ref().map(|p| p.logs.clone()).unwrap_or_default()));
    let total = Signal::derive(move || logs.data.with(|d| d.as_ref().map_or(0, |p| p.total)));

    view! {
        <div class="logs-page">
            <div class="log-filters">
                <div class="log-filters__field">
                    <label>"סוג פעולה:"</label>
                    <select
                        class="log-filters__select"
                        on:change=move |ev| draft.update(|f| f.action = event_target_value(&ev))
                    >
                        <option value="" selected=move || draft.with(|f| f.action.is_empty())>"הכל"</option>
                        {AuditAction::ITEM_ACTIONS
                            .into_iter()
                            .map(|action| view! {
                                <option
                                    value=action.as_str()
                                    selected=move || draft.with(|f| f.action == action.as_str())
                                >
                                    {action_label(action.as_str())}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </div>
                <input
                    type="text"
                    placeholder="חיפוש חופשי: סריאלי, מק\"ט, תיאור או משתמש"
                    prop:value=move || draft.with(|f| f.search.clone())
                    on:input=move |ev| draft.update(|f| f.search = event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            apply();
                        }
                    }
                />
                <div class="log-filters__actions">
                    <button class="btn btn-primary" on:click=move |_| apply()>"סנן"</button>
                    <button class="btn" on:click=move |_| clear()>"נקה"</button>
                </div>
            </div>
            {move || {
                if logs.loading.get() && logs.data.with(Option::is_none) {
                    return view! { <div class="logs-page__loading"><Spinner /></div> }.into_any();
                }
                if let Some(message) = logs.error_message() {
                    return view! { <div class="logs-page__error">{format!("שגיאה: {}", message)}</div> }.into_any();
                }
                view! { <LogTimeline logs=entries /> }.into_any()
            }}
            <Pager pagination=pagination total=total />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_skips_blank_fields() {
        let mut pagination = Pagination::new(50);
        pagination.go_to(3);
        let filter = LogFilter {
            action: String::new(),
            search: "  A-100 ".to_string(),
        };
        let query = filter.to_query(&pagination);
        assert_eq!(query.page, Some(3));
        assert_eq!(query.limit, Some(50));
        assert_eq!(query.action, None);
        assert_eq!(query.search.as_deref(), Some("A-100"));
    }
}
