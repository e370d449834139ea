//! Audit Log Viewer
//!
//! Every audited action across the system, filtered by action, actor,
//! target user, resource and date range.

use leptos::prelude::*;

use crate::components::{LogTimeline, Pager, Spinner};
use crate::context::use_api;
use crate::models::{action_label, AuditAction, AuditLogQuery};
use crate::pagination::Pagination;
use crate::query::{keys, use_query};

const AUDIT_PER_PAGE: u64 = 50;

const RESOURCES: [(&str, &str); 4] = [
    ("item", "פריטים"),
    ("user", "משתמשים"),
    ("group", "קבוצות"),
    ("procurement_order", "הזמנות רכש"),
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuditFilter {
    pub action: String,
    pub actor: String,
    pub target_user: String,
    pub target_resource: String,
    pub search: String,
    pub start_date: String,
    pub end_date: String,
}

impl AuditFilter {
    pub fn to_query(&self, pagination: &Pagination) -> AuditLogQuery {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        AuditLogQuery {
            action: non_empty(&self.action),
            actor: non_empty(&self.actor),
            target_user: non_empty(&self.target_user),
            target_resource: non_empty(&self.target_resource),
            resource_id: None,
            search: non_empty(&self.search),
            start_date: non_empty(&self.start_date),
            end_date: non_empty(&self.end_date),
            page: Some(pagination.page),
            page_size: Some(pagination.per_page),
        }
    }
}

#[component]
pub fn AdminAuditPage() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let pagination = RwSignal::new(Pagination::new(AUDIT_PER_PAGE));
    let draft = RwSignal::new(AuditFilter::default());
    let applied = RwSignal::new(AuditFilter::default());

    let logs = use_query(
        move || Some(applied.with(|f| f.to_query(&pagination.get()))),
        keys::audit_logs,
        move |query: AuditLogQuery| {
            let api = api.get_value();
            async move { api.audit_logs(&query).await }
        },
    );
    let entries = Signal::derive(move || logs.data.with(|d| d.as_ref().map(|p| p.logs.clone()).unwrap_or_default()));
    let total = Signal::derive(move || logs.data.with(|d| d.as_ref().map_or(0, |p| p.total)));

    let apply = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        applied.set(draft.get_untracked());
        pagination.update(|p| p.go_to(1));
    };
    let clear = move |_: leptos::ev::MouseEvent| {
        draft.set(AuditFilter::default());
        applied.set(AuditFilter::default());
        pagination.update(|p| p.go_to(1));
    };

    let text_field = move |label: &'static str, kind: &'static str, get: fn(&AuditFilter) -> String, set: fn(&mut AuditFilter, String)| {
        view! {
            <label class="field">
                <span>{label}</span>
                <input
                    type=kind
                    prop:value=move || draft.with(get)
                    on:input=move |ev| draft.update(|f| set(f, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="audit-page">
            <form class="audit-filters" on:submit=apply>
                <label class="field">
                    <span>"פעולה"</span>
                    <select on:change=move |ev| draft.update(|f| f.action = event_target_value(&ev))>
                        <option value="" selected=move || draft.with(|f| f.action.is_empty())>"הכל"</option>
                        {AuditAction::ALL
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
                </label>
                <label class="field">
                    <span>"משאב"</span>
                    <select on:change=move |ev| draft.update(|f| f.target_resource = event_target_value(&ev))>
                        <option value="" selected=move || draft.with(|f| f.target_resource.is_empty())>"הכל"</option>
                        {RESOURCES
                            .into_iter()
                            .map(|(value, label)| view! {
                                <option value=value selected=move || draft.with(|f| f.target_resource == value)>
                                    {label}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </label>
                {text_field("מבצע", "text", |f| f.actor.clone(), |f, v| f.actor = v)}
                {text_field("משתמש יעד", "text", |f| f.target_user.clone(), |f, v| f.target_user = v)}
                {text_field("חיפוש", "text", |f| f.search.clone(), |f, v| f.search = v)}
                {text_field("מתאריך", "date", |f| f.start_date.clone(), |f, v| f.start_date = v)}
                {text_field("עד תאריך", "date", |f| f.end_date.clone(), |f, v| f.end_date = v)}
                <div class="audit-filters__actions">
                    <button type="submit" class="btn btn-primary">"סנן"</button>
                    <button type="button" class="btn" on:click=clear>"נקה"</button>
                </div>
            </form>
            {move || {
                if logs.loading.get() && logs.data.with(Option::is_none) {
                    return view! { <Spinner /> }.into_any();
                }
                if let Some(message) = logs.error_message() {
                    return view! { <div class="form-error">{message}</div> }.into_any();
                }
                if entries.with(Vec::is_empty) {
                    return view! { <div class="empty">"אין רשומות להצגה"</div> }.into_any();
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
    fn test_audit_filter_query() {
        let filter = AuditFilter {
            action: "user_delete".to_string(),
            actor: " admin ".to_string(),
            start_date: "2024-01-01".to_string(),
            ..Default::default()
        };
        let query = filter.to_query(&Pagination::new(50));
        assert_eq!(query.action.as_deref(), Some("user_delete"));
        assert_eq!(query.actor.as_deref(), Some("admin"));
        assert_eq!(query.target_user, None);
        assert_eq!(query.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(query.end_date, None);
        assert_eq!(query.page, Some(1));
        assert_eq!(query.page_size, Some(50));
    }
}
