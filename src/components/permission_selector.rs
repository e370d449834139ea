//! Permission Selector
//!
//! Checkbox grid of the fine-grained permissions, grouped by area.

use leptos::prelude::*;

use crate::models::Permission;

const GROUPS: &[(&str, &[(Permission, &str)])] = &[
    (
        "מלאי",
        &[
            (Permission::InventoryRead, "צפייה בלבד"),
            (Permission::InventoryWrite, "מלאה (צפייה + עריכה)"),
        ],
    ),
    (
        "רכש",
        &[
            (Permission::ProcurementRead, "צפייה בלבד"),
            (Permission::ProcurementWrite, "מלאה (צפייה + עריכה)"),
        ],
    ),
    ("מערכת", &[(Permission::Admin, "אדמיניסטרטור")]),
];

/// Add or remove `permission`, keeping the list sorted
pub fn toggle_permission(list: &mut Vec<Permission>, permission: Permission) {
    if let Some(pos) = list.iter().position(|p| *p == permission) {
        list.remove(pos);
    } else {
        list.push(permission);
        list.sort();
    }
}

#[component]
pub fn PermissionSelector(selected: RwSignal<Vec<Permission>>) -> impl IntoView {
    view! {
        <div class="permission-selector">
            <label class="permission-selector-label">"הרשאות מפורטות"</label>
            <div class="permission-groups">
                {GROUPS
                    .iter()
                    .map(|(title, options)| {
                        view! {
                            <div class="permission-group">
                                <div class="permission-group-header">{*title}</div>
                                {options
                                    .iter()
                                    .map(|(permission, label)| {
                                        let permission = *permission;
                                        let checked = move || selected.with(|s| s.contains(&permission));
                                        view! {
                                            <label class=move || {
                                                if checked() { "permission-option active" } else { "permission-option" }
                                            }>
                                                <input
                                                    type="checkbox"
                                                    prop:checked=checked
                                                    on:change=move |_| selected.update(|s| toggle_permission(s, permission))
                                                />
                                                <span>{*label}</span>
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_permission() {
        let mut list = vec![Permission::Admin];
        toggle_permission(&mut list, Permission::InventoryRead);
        assert_eq!(list, vec![Permission::InventoryRead, Permission::Admin]);
        toggle_permission(&mut list, Permission::Admin);
        assert_eq!(list, vec![Permission::InventoryRead]);
    }

    #[test]
    fn test_every_permission_is_offered() {
        let offered: Vec<Permission> = GROUPS
            .iter()
            .flat_map(|(_, options)| options.iter().map(|(p, _)| *p))
            .collect();
        assert_eq!(offered, Permission::ALL.to_vec());
    }
}
