//! Login Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_api, use_auth};
use crate::validate;

/// Username/password form; `on_success` runs once the session user is loaded
#[component]
pub fn LoginForm(#[prop(into)] on_success: Callback<()>) -> impl IntoView {
    let api = StoredValue::new_local(use_api());
    let auth = use_auth();
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let user = username.get_untracked();
        let pass = password.get_untracked();
        if !validate::required(&user) || !validate::required(&pass) {
            set_error.set(Some("יש להזין שם משתמש וסיסמה".to_string()));
            return;
        }
        let api = api.get_value();
        set_error.set(None);
        set_loading.set(true);
        spawn_local(async move {
            let result = auth.login(&api, user.trim(), &pass).await;
            set_loading.set(false);
            match result {
                Ok(()) => on_success.run(()),
                Err(err) => {
                    log::warn!("[Auth] login failed: {}", err);
                    let message = if err.is_unauthorized() {
                        "שם משתמש או סיסמה שגויים".to_string()
                    } else {
                        err.user_message()
                    };
                    set_error.set(Some(message));
                }
            }
        });
    };

    view! {
        <form class="login-form" on:submit=submit>
            <h1>"כניסה למערכת"</h1>
            {move || error.get().map(|e| view! { <div class="form-error">{e}</div> })}
            <label class="field">
                <span>"שם משתמש"</span>
                <input
                    type="text"
                    autocomplete="username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
            </label>
            <label class="field">
                <span>"סיסמה"</span>
                <input
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </label>
            <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                {move || if loading.get() { "מתחבר..." } else { "התחבר" }}
            </button>
        </form>
    }
}
