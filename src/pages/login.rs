use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::components::{LoginForm, HOME_PATH};
use crate::context::use_auth;

/// Once the session user is set the redirect below takes over
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let on_success = Callback::new(|_: ()| log::debug!("[Auth] login form done"));

    view! {
        <div class="login-page">
            <Show
                when=move || !auth.is_authenticated()
                fallback=|| view! { <Redirect path=HOME_PATH /> }
            >
                <LoginForm on_success=on_success />
            </Show>
        </div>
    }
}
