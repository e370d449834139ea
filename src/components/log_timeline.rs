//! Log Timeline Component
//!
//! Audit entries as a vertical timeline, with their change sets rendered as
//! from/to lines.

use leptos::prelude::*;
use serde_json::Value;

use crate::format::{format_cell_value, format_date_time};
use crate::models::{action_label, AuditLogEntry, ItemField, ProcurementStatus, Role};

const SKIPPED: [&str; 2] = ["updated_at", "created_at"];

fn field_label(key: &str) -> &str {
    if let Some(field) = ItemField::from_key(key) {
        return field.label();
    }
    match key {
        "quantity" => "כמות",
        "amount" => "סכום",
        "order_date" => "תאריך הזמנה",
        "status" => "סטטוס",
        "received_emf" => "התקבל EMF",
        "received_bom" => "התקבל BOM",
        "filename" => "קובץ",
        "username" => "שם משתמש",
        "role" => "תפקיד",
        "is_active" => "פעיל",
        "permissions" => "הרשאות",
        "name" => "שם",
        other => other,
    }
}

fn display_value(key: &str, value: &Value) -> String {
    match value {
        Value::Null => "(ריק)".to_string(),
        Value::String(s) if s.is_empty() => "(ריק)".to_string(),
        Value::Bool(true) => "כן".to_string(),
        Value::Bool(false) => "לא".to_string(),
        Value::String(s) if key == "status" => ProcurementStatus::parse(s)
            .map(|st| st.label().to_string())
            .unwrap_or_else(|| s.clone()),
        Value::String(s) if key == "role" => Role::from_str_lossy(s).label().to_string(),
        other => format_cell_value(other),
    }
}

/// One rendered line of a change set
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeLine {
    pub label: String,
    pub old: Option<String>,
    pub new: String,
}

/// `{"field": {"old": a, "new": b}}` becomes a from/to line; plain values
/// (creates, file operations) show only the new value
pub fn describe_changes(changes: &Value) -> Vec<ChangeLine> {
    let Value::Object(map) = changes else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| !SKIPPED.contains(&key.as_str()))
        .map(|(key, value)| {
            let label = field_label(key).to_string();
            match value {
                Value::Object(diff) if diff.contains_key("old") || diff.contains_key("new") => {
                    ChangeLine {
                        label,
                        old: Some(display_value(key, diff.get("old").unwrap_or(&Value::Null))),
                        new: display_value(key, diff.get("new").unwrap_or(&Value::Null)),
                    }
                }
                other => ChangeLine {
                    label,
                    old: None,
                    new: display_value(key, other),
                },
            }
        })
        .collect()
}

/// Color class by what the action did
pub fn action_class(action: &str) -> &'static str {
    let normalized = ["item_", "user_", "procurement_"]
        .iter()
        .find_map(|prefix| action.strip_prefix(prefix))
        .unwrap_or(action);
    match normalized {
        "create" | "import" | "file_upload" | "group_create" => "log-item success",
        "update" | "bulk_update" | "password_change" | "role_change" | "group_update" => "log-item info",
        "delete" | "bulk_delete" | "delete_all" | "file_delete" | "group_delete" => "log-item danger",
        "undo" => "log-item undo",
        _ => "log-item",
    }
}

#[component]
pub fn ChangeList(lines: Vec<ChangeLine>) -> impl IntoView {
    view! {
        <div class="log-changes">
            {lines
                .into_iter()
                .map(|line| view! {
                    <div class="change-item">
                        <span class="change-field">{format!("{}:", line.label)}</span>
                        {line.old.map(|old| view! {
                            <span class="change-old">{old}</span>
                            <span class="arrow">"←"</span>
                        })}
                        <span class="change-new">{line.new}</span>
                    </div>
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn LogTimeline(#[prop(into)] logs: Signal<Vec<AuditLogEntry>>) -> impl IntoView {
    view! {
        <div class="log-timeline">
            <For
                each=move || logs.get()
                key=|entry| entry.id.clone()
                children=|entry| {
                    let item = entry.item_identifier();
                    let lines = entry.changes.as_ref().map(describe_changes).unwrap_or_default();
                    view! {
                        <div class=action_class(&entry.action)>
                            <div class="log-item-header">
                                <span class="log-item-action">{action_label(&entry.action).to_string()}</span>
                                <span class="log-item-user">{entry.actor.clone()}</span>
                                <span class="log-item-time">{format_date_time(Some(&entry.timestamp))}</span>
                            </div>
                            {entry.target_user.clone().map(|user| view! {
                                <div class="log-item-detail">
                                    <strong>"משתמש: "</strong>
                                    {user}
                                    {entry.target_role.clone().map(|role| view! { <span class="role-badge">{role}</span> })}
                                </div>
                            })}
                            {(!item.is_empty()).then(|| view! {
                                <div class="log-item-detail">
                                    <strong>"פריט: "</strong>
                                    {item}
                                </div>
                            })}
                            {entry.details.clone().map(|details| view! { <div class="log-item-detail">{details}</div> })}
                            {entry.reason.clone().map(|reason| view! {
                                <div class="log-item-detail">
                                    <strong>"סיבה: "</strong>
                                    {reason}
                                </div>
                            })}
                            {(!lines.is_empty()).then(|| view! { <ChangeList lines=lines /> })}
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_update_and_create() {
        let update = describe_changes(&json!({
            "status": {"old": "ordered", "new": "received"},
            "updated_at": "2024-01-01"
        }));
        assert_eq!(
            update,
            vec![ChangeLine {
                label: "סטטוס".into(),
                old: Some("רכש יצא".into()),
                new: "רכש הגיע".into(),
            }]
        );

        let create = describe_changes(&json!({"received_bom": true, "filename": "bom.pdf"}));
        assert_eq!(create.len(), 2);
        assert!(create.iter().all(|l| l.old.is_none()));
        assert!(create.iter().any(|l| l.label == "קובץ" && l.new == "bom.pdf"));
        assert!(create.iter().any(|l| l.new == "כן"));
    }

    #[test]
    fn test_item_fields_and_empty_values() {
        let lines = describe_changes(&json!({"location": {"old": null, "new": "A-2"}}));
        assert_eq!(lines[0].label, "מיקום");
        assert_eq!(lines[0].old.as_deref(), Some("(ריק)"));
        assert_eq!(lines[0].new, "A-2");
    }

    #[test]
    fn test_non_object_changes_are_ignored() {
        assert!(describe_changes(&json!("free text")).is_empty());
    }

    #[test]
    fn test_action_class() {
        assert_eq!(action_class("item_delete"), "log-item danger");
        assert_eq!(action_class("procurement_file_upload"), "log-item success");
        assert_eq!(action_class("undo"), "log-item undo");
        assert_eq!(action_class("login"), "log-item");
    }
}
