//! Warehouse Frontend App
//!
//! Provides the shared context (config, API client, query cache, store,
//! session) and lays out the routes.

use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::api::{Api, ApiClient, HttpTransport};
use crate::browser;
use crate::components::{AdminRoute, Header, PermissionRoute, PrivateRoute, ToastHost, HOME_PATH};
use crate::config::AppConfig;
use crate::context::{provide_api, AuthContext};
use crate::models::Permission;
use crate::pages::{
    AdminAuditPage, AdminPage, AdminUsersPage, DashboardPage, InventoryTabsPage, LoginPage, LogsPage,
    ProcurementPage, StalePage,
};
use crate::query::{provide_query_client, QueryClient};
use crate::store::{AppState, AppStore};

/// Portal single sign-on hands the session over in this parameter
const HASH_TOKEN_PARAM: &str = "hashToken";

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let api: Api = ApiClient::new(HttpTransport::new(&config.api_base_url))
        .with_unauthorized_hook(browser::redirect_to_login)
        .with_retry(config.retry.clone());
    provide_api(api.clone());
    provide_query_client(QueryClient::new(config.query_stale_ms, config.cache_max_bytes));
    provide_context(AppStore::new(AppState::new(config.toast_ms)));
    provide_context(config);

    let auth = AuthContext::new();
    provide_context(auth);

    let hash_token = browser::url_param(HASH_TOKEN_PARAM);
    if hash_token.is_some() {
        browser::remove_url_param(HASH_TOKEN_PARAM);
    }
    auth.start_session(api, hash_token);

    view! {
        <Router>
            <Show when=move || auth.is_authenticated()>
                <Header />
            </Show>
            <main class="main-content">
                <Routes fallback=|| view! { <Redirect path=HOME_PATH /> }>
                    <Route path=path!("/login") view=LoginPage />
                    <Route
                        path=path!("/dashboard")
                        view=|| view! { <PrivateRoute><DashboardPage /></PrivateRoute> }
                    />
                    <Route
                        path=path!("/inventory")
                        view=|| view! {
                            <PermissionRoute permission=Permission::InventoryRead>
                                <InventoryTabsPage />
                            </PermissionRoute>
                        }
                    />
                    <Route
                        path=path!("/stale")
                        view=|| view! { <PrivateRoute><StalePage /></PrivateRoute> }
                    />
                    <Route
                        path=path!("/logs")
                        view=|| view! { <PrivateRoute><LogsPage /></PrivateRoute> }
                    />
                    <Route
                        path=path!("/procurement")
                        view=|| view! {
                            <PermissionRoute permission=Permission::ProcurementRead>
                                <ProcurementPage />
                            </PermissionRoute>
                        }
                    />
                    <Route
                        path=path!("/admin")
                        view=|| view! { <AdminRoute><AdminPage /></AdminRoute> }
                    />
                    <Route
                        path=path!("/admin/users")
                        view=|| view! { <AdminRoute><AdminUsersPage /></AdminRoute> }
                    />
                    <Route
                        path=path!("/admin/audit")
                        view=|| view! { <AdminRoute><AdminAuditPage /></AdminRoute> }
                    />
                    <Route path=path!("/") view=|| view! { <Redirect path=HOME_PATH /> } />
                </Routes>
            </main>
            <ToastHost />
        </Router>
    }
}
