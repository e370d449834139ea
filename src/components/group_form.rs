//! Group Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{Modal, PermissionSelector};
use crate::context::use_api;
use crate::models::{Group, GroupUpdate, NewGroup, Permission, Role};
use crate::query::{keys, use_query_client};
use crate::store::{toast_success, use_app_store};
use crate::validate;

/// Build the create body; the name is required
pub fn new_group(name: &str, role: Role, permissions: Vec<Permission>) -> Result<NewGroup, &'static str> {
    if !validate::required(name) {
        return Err("יש להזין שם קבוצה");
    }
    Ok(NewGroup {
        name: name.trim().to_string(),
        role,
        permissions,
    })
}

#[component]
pub fn GroupForm(
    #[prop(into)] show: Signal<bool>,
    /// `None` creates a new group
    #[prop(into)]
    group: Signal<Option<Group>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let store = use_app_store();

    let name = RwSignal::new(String::new());
    let role = RwSignal::new(Role::User);
    let is_active = RwSignal::new(true);
    let permissions = RwSignal::new(Vec::<Permission>::new());
    let (error, set_error) = signal(None::<String>);
    let (saving, set_saving) = signal(false);

    Effect::new(move |_| {
        if !show.get() {
            return;
        }
        match group.get() {
            Some(g) => {
                name.set(g.name);
                role.set(g.role);
                is_active.set(g.is_active);
                permissions.set(g.permissions);
            }
            None => {
                name.set(String::new());
                role.set(Role::User);
                is_active.set(true);
                permissions.set(Vec::new());
            }
        }
        set_error.set(None);
    });

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let body = match new_group(&name.get_untracked(), role.get_untracked(), permissions.get_untracked()) {
            Ok(body) => body,
            Err(msg) => {
                set_error.set(Some(msg.to_string()));
                return;
            }
        };
        let existing = group.get_untracked();
        let active = is_active.get_untracked();
        let api = api.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let result = match existing {
                Some(g) => {
                    let update = GroupUpdate {
                        name: Some(body.name),
                        role: Some(body.role),
                        permissions: Some(body.permissions),
                        is_active: Some(active),
                    };
                    api.update_group(&g.id, &update).await
                }
                None => api.create_group(&body).await,
            };
            set_saving.set(false);
            match result {
                Ok(saved) => {
                    log::info!("[Admin] saved group {}", saved.name);
                    toast_success(&store, "הקבוצה נשמרה");
                    queries.with_value(|q| q.invalidate(&keys::groups()));
                    on_close.run(());
                }
                Err(err) => set_error.set(Some(err.user_message())),
            }
        });
    };

    let title = Signal::derive(move || {
        if group.with(Option::is_some) { "עריכת קבוצה" } else { "קבוצה חדשה" }.to_string()
    });

    view! {
        <Modal show=show title=title on_close=on_close>
            <form class="group-form" on:submit=submit>
                {move || error.get().map(|e| view! { <div class="form-error">{e}</div> })}
                <label class="field">
                    <span>"שם הקבוצה"</span>
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"תפקיד"</span>
                    <select on:change=move |ev| role.set(Role::from_str_lossy(&event_target_value(&ev)))>
                        {Role::ALL
                            .into_iter()
                            .map(|r| view! {
                                <option value=r.as_str() selected=move || role.get() == r>{r.label()}</option>
                            })
                            .collect_view()}
                    </select>
                </label>
                <Show when=move || group.with(Option::is_some)>
                    <label class="field field-checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || is_active.get()
                            on:change=move |_| is_active.update(|a| *a = !*a)
                        />
                        "קבוצה פעילה"
                    </label>
                </Show>
                <PermissionSelector selected=permissions />
                <div class="modal-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "שומר..." } else { "שמירה" }}
                    </button>
                    <button type="button" class="btn" on:click=move |_| on_close.run(())>"ביטול"</button>
                </div>
            </form>
        </Modal>
    }
}
