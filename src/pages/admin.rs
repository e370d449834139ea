//! Admin Page
//!
//! Tabs for users, groups and a read-only permission overview.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{DeleteReasonModal, GroupForm, Spinner};
use crate::context::use_api;
use crate::format::format_date;
use crate::models::{Group, Permission, Role, User};
use crate::pages::admin_users::{role_class, UsersPanel};
use crate::query::{keys, use_query, use_query_client};
use crate::store::{toast_error, toast_success, use_app_store};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Users,
    Groups,
    Permissions,
}

impl AdminTab {
    pub const ALL: [AdminTab; 3] = [AdminTab::Users, AdminTab::Groups, AdminTab::Permissions];

    pub fn label(self) -> &'static str {
        match self {
            AdminTab::Users => "משתמשים",
            AdminTab::Groups => "קבוצות",
            AdminTab::Permissions => "הרשאות",
        }
    }
}

/// Whether `user` holds `permission` directly (superadmins hold all)
pub fn holds(user: &User, permission: Permission) -> bool {
    user.role == Role::Superadmin || user.permissions.contains(&permission)
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let (tab, set_tab) = signal(AdminTab::default());

    view! {
        <div class="admin-page">
            <div class="access-tabs">
                {AdminTab::ALL
                    .into_iter()
                    .map(|t| view! {
                        <button
                            class=move || if tab.get() == t { "tab-btn active" } else { "tab-btn" }
                            on:click=move |_| set_tab.set(t)
                        >
                            {t.label()}
                        </button>
                    })
                    .collect_view()}
            </div>
            {move || match tab.get() {
                AdminTab::Users => view! { <UsersPanel /> }.into_any(),
                AdminTab::Groups => view! { <GroupsPanel /> }.into_any(),
                AdminTab::Permissions => view! { <PermissionMatrix /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn GroupsPanel() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let store = use_app_store();

    let groups = use_query(
        || Some(()),
        |_: &()| keys::groups(),
        move |_: ()| {
            let api = api.get_value();
            async move { api.list_groups().await }
        },
    );
    let rows = Signal::derive(move || groups.data.with(|d| d.as_ref().map(|l| l.groups.clone()).unwrap_or_default()));

    let (form_open, set_form_open) = signal(false);
    let editing = RwSignal::new(None::<Group>);
    let deleting = RwSignal::new(None::<Group>);

    let confirm_delete = Callback::new(move |reason: String| {
        let Some(group) = deleting.get_untracked() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            match api.delete_group(&group.id, &reason).await {
                Ok(_) => {
                    log::info!("[Admin] deleted group {}", group.name);
                    toast_success(&store, "קבוצה נמחקה בהצלחה");
                    deleting.set(None);
                    queries.with_value(|q| q.invalidate(&keys::groups()));
                }
                Err(err) => toast_error(&store, &err),
            }
        });
    });

    view! {
        <div class="admin-panel">
            <div class="admin-page__header">
                <h2>"ניהול קבוצות"</h2>
                <button
                    class="btn btn-primary"
                    on:click=move |_| {
                        editing.set(None);
                        set_form_open.set(true);
                    }
                >
                    "+ הוסף קבוצה"
                </button>
            </div>
            {move || groups.error_message().map(|m| view! { <div class="form-error">{m}</div> })}
            <Show
                when=move || !(groups.loading.get() && groups.data.with(Option::is_none))
                fallback=|| view! { <Spinner /> }
            >
                <table class="admin-page__table">
                    <thead>
                        <tr>
                            <th>"שם קבוצה"</th>
                            <th>"תפקיד"</th>
                            <th>"הרשאות"</th>
                            <th>"סטטוס"</th>
                            <th>"נוצר בתאריך"</th>
                            <th>"פעולות"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows.get()
                            key=|group| serde_json::to_string(group).unwrap_or_else(|_| group.id.clone())
                            children=move |group| {
                                let permissions = group
                                    .permissions
                                    .iter()
                                    .map(|p| p.label())
                                    .collect::<Vec<_>>()
                                    .join(", ");
                                let (status_class, status) = if group.is_active {
                                    ("status-badge status--active", "פעילה")
                                } else {
                                    ("status-badge status--inactive", "לא פעילה")
                                };
                                let for_edit = group.clone();
                                let for_delete = group.clone();
                                view! {
                                    <tr>
                                        <td>{group.name.clone()}</td>
                                        <td><span class=role_class(group.role)>{group.role.label()}</span></td>
                                        <td class="permissions-cell">{permissions}</td>
                                        <td><span class=status_class>{status}</span></td>
                                        <td>{format_date(group.created_at.as_deref())}</td>
                                        <td class="admin-page__actions">
                                            <button
                                                class="btn btn-small"
                                                on:click=move |_| {
                                                    editing.set(Some(for_edit.clone()));
                                                    set_form_open.set(true);
                                                }
                                            >
                                                "עריכה"
                                            </button>
                                            <button
                                                class="btn btn-small btn-danger"
                                                on:click=move |_| deleting.set(Some(for_delete.clone()))
                                            >
                                                "מחיקה"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || rows.with(Vec::is_empty)>
                    <div class="admin-page__empty">"אין קבוצות להצגה"</div>
                </Show>
            </Show>

            <GroupForm
                show=form_open
                group=editing
                on_close=Callback::new(move |_: ()| set_form_open.set(false))
            />
            <DeleteReasonModal
                show=Signal::derive(move || deleting.with(Option::is_some))
                message=Signal::derive(move || {
                    deleting.with(|g| {
                        g.as_ref()
                            .map(|g| format!("האם למחוק את הקבוצה {}?", g.name))
                            .unwrap_or_default()
                    })
                })
                on_confirm=confirm_delete
                on_close=Callback::new(move |_: ()| deleting.set(None))
            />
        </div>
    }
}

/// Users by permission, at a glance
#[component]
fn PermissionMatrix() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let users = use_query(
        || Some(()),
        |_: &()| keys::users(),
        move |_: ()| {
            let api = api.get_value();
            async move { api.list_users().await }
        },
    );

    move || {
        if users.loading.get() && users.data.with(Option::is_none) {
            return view! { <Spinner /> }.into_any();
        }
        let rows = users.data.with(|d| d.as_ref().map(|l| l.users.clone()).unwrap_or_default());
        view! {
            <table class="admin-page__table permission-matrix">
                <thead>
                    <tr>
                        <th>"שם משתמש"</th>
                        {Permission::ALL.into_iter().map(|p| view! { <th>{p.label()}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|user| {
                            let cells = Permission::ALL
                                .into_iter()
                                .map(|p| {
                                    let mark = if holds(&user, p) { "✓" } else { "" };
                                    view! { <td class="matrix-cell">{mark}</td> }
                                })
                                .collect_view();
                            view! {
                                <tr>
                                    <td>{user.username.clone()}</td>
                                    {cells}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
            .into_any()
    }
}
