//! Route Guards
//!
//! Wrap a page and redirect when the session does not allow it. A spinner
//! is shown until the first `/auth/me` answer arrives.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::browser::LOGIN_PATH;
use crate::context::{use_auth, AuthContext};
use crate::models::Permission;

pub const HOME_PATH: &str = "/dashboard";

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="spinner-wrap">
            <div class="spinner"></div>
        </div>
    }
}

fn guarded<A>(auth: AuthContext, allowed: A, children: ChildrenFn) -> impl IntoView
where
    A: Fn(&AuthContext) -> bool + Send + Sync + 'static,
{
    move || {
        if auth.loading.get() {
            view! { <Spinner /> }.into_any()
        } else if !auth.is_authenticated() {
            view! { <Redirect path=LOGIN_PATH /> }.into_any()
        } else if !allowed(&auth) {
            log::info!("[Guard] {} denied, redirecting home", auth.username());
            view! { <Redirect path=HOME_PATH /> }.into_any()
        } else {
            children()
        }
    }
}

/// Any logged-in user
#[component]
pub fn PrivateRoute(children: ChildrenFn) -> impl IntoView {
    guarded(use_auth(), |_| true, children)
}

#[component]
pub fn AdminRoute(children: ChildrenFn) -> impl IntoView {
    guarded(use_auth(), AuthContext::is_admin, children)
}

/// `:ro` routes also open for the matching `:rw` grant
#[component]
pub fn PermissionRoute(permission: Permission, children: ChildrenFn) -> impl IntoView {
    guarded(use_auth(), move |auth| auth.can_access(permission), children)
}
