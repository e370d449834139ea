//! User Management
//!
//! The users table with its stat cards; also embedded as the first tab of
//! the admin page.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{DeleteReasonModal, Spinner, StatCard, UserForm};
use crate::context::{use_api, use_auth};
use crate::format::format_date;
use crate::models::{AdminStats, Role, User, UserUpdate};
use crate::query::{keys, use_query, use_query_client};
use crate::store::{toast_error, toast_success, use_app_store};

pub fn role_class(role: Role) -> &'static str {
    match role {
        Role::Superadmin => "role-badge role--superadmin",
        Role::Admin => "role-badge role--admin",
        Role::User => "role-badge role--user",
    }
}

fn status_badge(active: bool, on: &'static str, off: &'static str) -> impl IntoView {
    let class = if active { "status-badge status--active" } else { "status-badge status--inactive" };
    view! { <span class=class>{if active { on } else { off }}</span> }
}

#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let stats = use_query(
        || Some(()),
        |_: &()| keys::admin_stats(),
        move |_: ()| {
            let api = api.get_value();
            async move { api.admin_stats().await }
        },
    );
    let stat = move |pick: fn(&AdminStats) -> u64| {
        Signal::derive(move || stats.data.with(|d| d.as_ref().map(pick).unwrap_or(0)).to_string())
    };

    view! {
        <div class="admin-page">
            <div class="admin-stats-grid">
                <StatCard title="סה\"כ משתמשים" value=stat(|s| s.total_users) color="blue" />
                <StatCard title="משתמשים פעילים" value=stat(|s| s.active_users) color="green" />
                <StatCard title="מנהלים" value=stat(|s| s.admins + s.superadmins) color="purple" />
                <StatCard title="משתמשים רגילים" value=stat(|s| s.regular_users) color="amber" />
            </div>
            <UsersPanel />
        </div>
    }
}

/// Users table with create, edit, activate/deactivate and delete
#[component]
pub fn UsersPanel() -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let auth = use_auth();
    let store = use_app_store();

    let users = use_query(
        || Some(()),
        |_: &()| keys::users(),
        move |_: ()| {
            let api = api.get_value();
            async move { api.list_users().await }
        },
    );
    let rows = Signal::derive(move || users.data.with(|d| d.as_ref().map(|l| l.users.clone()).unwrap_or_default()));

    let (form_open, set_form_open) = signal(false);
    let editing = RwSignal::new(None::<User>);
    let deleting = RwSignal::new(None::<User>);

    let changed = move || queries.with_value(|q| q.invalidate(&keys::users()));

    let toggle_active = move |user: User| {
        let api = api.get_value();
        let update = UserUpdate {
            is_active: Some(!user.is_active),
            ..Default::default()
        };
        spawn_local(async move {
            match api.update_user(&user.id, &update).await {
                Ok(_) => {
                    log::info!("[Admin] {} active={}", user.username, !user.is_active);
                    toast_success(&store, if user.is_active { "המשתמש הושבת" } else { "המשתמש הופעל" });
                    changed();
                }
                Err(err) => toast_error(&store, &err),
            }
        });
    };

    let confirm_delete = Callback::new(move |reason: String| {
        let Some(user) = deleting.get_untracked() else {
            return;
        };
        let api = api.get_value();
        spawn_local(async move {
            match api.delete_user(&user.id, &reason).await {
                Ok(_) => {
                    log::info!("[Admin] deleted user {}", user.username);
                    toast_success(&store, "משתמש נמחק בהצלחה");
                    deleting.set(None);
                    changed();
                }
                Err(err) => toast_error(&store, &err),
            }
        });
    });

    view! {
        <div class="admin-panel">
            <div class="admin-page__header">
                <h2>"ניהול משתמשים"</h2>
                <button
                    class="btn btn-primary"
                    on:click=move |_| {
                        editing.set(None);
                        set_form_open.set(true);
                    }
                >
                    "+ הוסף משתמש"
                </button>
            </div>
            {move || users.error_message().map(|m| view! { <div class="form-error">{m}</div> })}
            <Show
                when=move || !(users.loading.get() && users.data.with(Option::is_none))
                fallback=|| view! { <Spinner /> }
            >
                <table class="admin-page__table">
                    <thead>
                        <tr>
                            <th>"שם משתמש"</th>
                            <th>"תפקיד"</th>
                            <th>"סטטוס"</th>
                            <th>"נוצר בתאריך"</th>
                            <th>"כניסה אחרונה"</th>
                            <th>"פעולות"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows.get()
                            key=|user| serde_json::to_string(user).unwrap_or_else(|_| user.id.clone())
                            children=move |user| {
                                // Nobody deactivates or deletes their own account
                                let is_self = user.username == auth.username();
                                let for_edit = user.clone();
                                let for_toggle = user.clone();
                                let for_delete = user.clone();
                                view! {
                                    <tr>
                                        <td>{user.username.clone()}</td>
                                        <td><span class=role_class(user.role)>{user.role.label()}</span></td>
                                        <td>{status_badge(user.is_active, "פעיל", "לא פעיל")}</td>
                                        <td>{format_date(user.created_at.as_deref())}</td>
                                        <td>{format_date(user.last_login.as_deref())}</td>
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
                                                class="btn btn-small"
                                                disabled=is_self
                                                on:click=move |_| toggle_active(for_toggle.clone())
                                            >
                                                {if user.is_active { "השבת" } else { "הפעל" }}
                                            </button>
                                            <button
                                                class="btn btn-small btn-danger"
                                                disabled=is_self
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
                    <div class="admin-page__empty">"אין משתמשים להצגה"</div>
                </Show>
            </Show>

            <UserForm
                show=form_open
                user=editing
                on_close=Callback::new(move |_: ()| set_form_open.set(false))
            />
            <DeleteReasonModal
                show=Signal::derive(move || deleting.with(Option::is_some))
                message=Signal::derive(move || {
                    deleting.with(|u| {
                        u.as_ref()
                            .map(|u| format!("האם למחוק את המשתמש {}?", u.username))
                            .unwrap_or_default()
                    })
                })
                on_confirm=confirm_delete
                on_close=Callback::new(move |_: ()| deleting.set(None))
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_class() {
        assert_eq!(role_class(Role::Admin), "role-badge role--admin");
        assert_ne!(role_class(Role::User), role_class(Role::Superadmin));
    }
}
