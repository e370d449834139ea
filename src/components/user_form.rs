//! User Form Component
//!
//! Create a user, or edit one. On edit an empty password keeps the current
//! one and an unchanged username is not sent.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{Modal, PermissionSelector};
use crate::context::use_api;
use crate::models::{NewUser, Permission, Role, User, UserUpdate};
use crate::query::{keys, use_query_client};
use crate::store::{toast_success, use_app_store};
use crate::validate;

const MIN_USERNAME_LEN: usize = 3;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserFormData {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub is_active: bool,
    pub permissions: Vec<Permission>,
}

impl UserFormData {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: String::new(),
            role: user.role,
            is_active: user.is_active,
            permissions: user.permissions.clone(),
        }
    }

    pub fn to_new_user(&self) -> Result<NewUser, &'static str> {
        let username = self.username.trim();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err("שם המשתמש חייב להכיל לפחות 3 תווים");
        }
        if !validate::password(&self.password) {
            return Err("הסיסמה קצרה מדי");
        }
        Ok(NewUser {
            username: username.to_string(),
            password: self.password.clone(),
            role: self.role,
            permissions: self.permissions.clone(),
        })
    }

    /// Only what differs from `original` is sent
    pub fn to_update(&self, original: &User) -> Result<UserUpdate, &'static str> {
        let username = self.username.trim();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err("שם המשתמש חייב להכיל לפחות 3 תווים");
        }
        if !self.password.is_empty() && !validate::password(&self.password) {
            return Err("הסיסמה קצרה מדי");
        }
        Ok(UserUpdate {
            username: (username != original.username).then(|| username.to_string()),
            role: Some(self.role),
            is_active: Some(self.is_active),
            permissions: Some(self.permissions.clone()),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        })
    }
}

#[component]
pub fn UserForm(
    #[prop(into)] show: Signal<bool>,
    /// `None` creates a new user
    #[prop(into)]
    user: Signal<Option<User>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let queries = StoredValue::new_local(use_query_client());
    let store = use_app_store();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::User);
    let is_active = RwSignal::new(true);
    let permissions = RwSignal::new(Vec::<Permission>::new());
    let (error, set_error) = signal(None::<String>);
    let (saving, set_saving) = signal(false);

    // Load the edited user each time the form opens
    Effect::new(move |_| {
        if !show.get() {
            return;
        }
        let data = user.get().as_ref().map(UserFormData::from_user).unwrap_or(UserFormData {
            is_active: true,
            ..Default::default()
        });
        username.set(data.username);
        password.set(data.password);
        role.set(data.role);
        is_active.set(data.is_active);
        permissions.set(data.permissions);
        set_error.set(None);
    });

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let data = UserFormData {
            username: username.get_untracked(),
            password: password.get_untracked(),
            role: role.get_untracked(),
            is_active: is_active.get_untracked(),
            permissions: permissions.get_untracked(),
        };
        let original = user.get_untracked();
        let api = api.get_value();
        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let result = match &original {
                Some(original) => match data.to_update(original) {
                    Ok(update) => api.update_user(&original.id, &update).await.map_err(|e| e.user_message()),
                    Err(msg) => Err(msg.to_string()),
                },
                None => match data.to_new_user() {
                    Ok(new_user) => api.create_user(&new_user).await.map_err(|e| e.user_message()),
                    Err(msg) => Err(msg.to_string()),
                },
            };
            set_saving.set(false);
            match result {
                Ok(saved) => {
                    log::info!("[Admin] saved user {}", saved.username);
                    toast_success(&store, "המשתמש נשמר");
                    queries.with_value(|q| q.invalidate(&keys::users()));
                    on_close.run(());
                }
                Err(msg) => set_error.set(Some(msg)),
            }
        });
    };

    let title = Signal::derive(move || {
        if user.with(Option::is_some) { "עריכת משתמש" } else { "הוספת משתמש חדש" }.to_string()
    });

    view! {
        <Modal show=show title=title on_close=on_close>
            <form class="user-form" on:submit=submit>
                {move || error.get().map(|e| view! { <div class="form-error">{e}</div> })}
                <label class="field">
                    <span>"שם משתמש"</span>
                    <input
                        type="text"
                        placeholder="הכנס שם משתמש"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>
                        "סיסמה"
                        {move || user.with(Option::is_some).then_some(" (השאר ריק לשמירת הסיסמה הנוכחית)")}
                    </span>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
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
                <Show when=move || user.with(Option::is_some)>
                    <label class="field field-checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || is_active.get()
                            on:change=move |_| is_active.update(|a| *a = !*a)
                        />
                        "משתמש פעיל"
                    </label>
                </Show>
                <PermissionSelector selected=permissions />
                <div class="modal-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || match (saving.get(), user.with(Option::is_some)) {
                            (true, _) => "שומר...",
                            (false, true) => "עדכון",
                            (false, false) => "הוספה",
                        }}
                    </button>
                    <button type="button" class="btn" on:click=move |_| on_close.run(())>"ביטול"</button>
                </div>
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> User {
        User {
            id: "u1".into(),
            username: "dana".into(),
            role: Role::User,
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_update_skips_unchanged_username_and_empty_password() {
        let user = existing();
        let mut form = UserFormData::from_user(&user);
        form.role = Role::Admin;
        let update = form.to_update(&user).unwrap();
        assert_eq!(update.username, None);
        assert_eq!(update.password, None);
        assert_eq!(update.role, Some(Role::Admin));

        form.username = "dana2".into();
        form.password = "secret".into();
        let update = form.to_update(&user).unwrap();
        assert_eq!(update.username.as_deref(), Some("dana2"));
        assert_eq!(update.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_new_user_validation() {
        let mut form = UserFormData {
            username: "ab".into(),
            password: "1234".into(),
            ..Default::default()
        };
        assert!(form.to_new_user().is_err());
        form.username = " abc ".into();
        form.password = "12".into();
        assert!(form.to_new_user().is_err());
        form.password = "123".into();
        let user = form.to_new_user().unwrap();
        assert_eq!(user.username, "abc");
    }
}
