//! Header Component
//!
//! Top bar with navigation; links are filtered by the user's permissions.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::browser::LOGIN_PATH;
use crate::context::{use_api, use_auth, AuthContext};
use crate::models::Permission;
use crate::query::use_query_client;

struct NavLink {
    href: &'static str,
    label: &'static str,
    visible: fn(&AuthContext) -> bool,
}

const NAV_LINKS: &[NavLink] = &[
    NavLink {
        href: "/dashboard",
        label: "לוח בקרה",
        visible: |_| true,
    },
    NavLink {
        href: "/inventory",
        label: "מלאי",
        visible: |auth| auth.can_access(Permission::InventoryRead),
    },
    NavLink {
        href: "/stale",
        label: "פריטים ישנים",
        visible: |_| true,
    },
    NavLink {
        href: "/procurement",
        label: "רכש",
        visible: |auth| auth.can_access(Permission::ProcurementRead),
    },
    NavLink {
        href: "/logs",
        label: "יומן פעילות",
        visible: |_| true,
    },
    NavLink {
        href: "/admin",
        label: "ניהול",
        visible: AuthContext::is_admin,
    },
];

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let queries = use_query_client();
    let navigate = use_navigate();
    let (busy, set_busy) = signal(false);

    let logout = move |_: leptos::ev::MouseEvent| {
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        let api = api.clone();
        let queries = queries.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            auth.logout(&api, &queries).await;
            set_busy.set(false);
            navigate(LOGIN_PATH, Default::default());
        });
    };

    view! {
        <header class="app-header">
            <div class="brand">"ניהול מחסן"</div>
            <nav class="main-nav">
                {move || {
                    NAV_LINKS
                        .iter()
                        .filter(|link| (link.visible)(&auth))
                        .map(|link| view! { <A href=link.href>{link.label}</A> })
                        .collect_view()
                }}
            </nav>
            <div class="user-box">
                <span class="user-name">{move || auth.username()}</span>
                <span class="user-role">
                    {move || {
                        auth.user
                            .with(|u| u.as_ref().map(|u| u.role.label()))
                            .unwrap_or_default()
                    }}
                </span>
                <button class="btn btn-link" disabled=move || busy.get() on:click=logout>
                    "התנתק"
                </button>
            </div>
        </header>
    }
}
