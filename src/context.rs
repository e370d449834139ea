//! Application Context
//!
//! Session state, the API client and config, provided via the Leptos
//! Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{Api, ApiError};
use crate::config::AppConfig;
use crate::models::{CurrentUser, Permission};
use crate::query::QueryClient;

// ========================
// API client / config
// ========================

pub fn provide_api(api: Api) {
    provide_context(StoredValue::new_local(api));
}

pub fn use_api() -> Api {
    expect_context::<StoredValue<Api, LocalStorage>>().get_value()
}

pub fn use_config() -> AppConfig {
    expect_context::<AppConfig>()
}

// ========================
// Auth
// ========================

/// Current session, shared by guards, header and pages
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub user: RwSignal<Option<CurrentUser>>,
    /// True until the first `/auth/me` answer
    pub loading: RwSignal<bool>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            user: RwSignal::new(None),
            loading: RwSignal::new(true),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.with(|u| u.is_some())
    }

    pub fn is_admin(&self) -> bool {
        self.user.with(|u| u.as_ref().is_some_and(CurrentUser::is_admin))
    }

    pub fn is_super_admin(&self) -> bool {
        self.user
            .with(|u| u.as_ref().is_some_and(CurrentUser::is_super_admin))
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.user
            .with(|u| u.as_ref().is_some_and(|u| u.has_permission(permission)))
    }

    pub fn can_access(&self, permission: Permission) -> bool {
        self.user
            .with(|u| u.as_ref().is_some_and(|u| u.can_access(permission)))
    }

    pub fn username(&self) -> String {
        self.user
            .with(|u| u.as_ref().map(|u| u.username.clone()))
            .unwrap_or_default()
    }

    pub fn role(&self) -> Option<String> {
        self.user
            .with(|u| u.as_ref().map(|u| u.role.as_str().to_string()))
    }

    /// Ask the backend who is logged in
    pub fn refresh(&self, api: Api) {
        self.start_session(api, None);
    }

    /// Resolve the session, first trading a portal `hash_token` for a
    /// cookie when one came with the link
    pub fn start_session(&self, api: Api, hash_token: Option<String>) {
        let auth = *self;
        auth.loading.set(true);
        spawn_local(async move {
            match api.resolve_session(hash_token.as_deref()).await {
                Ok(user) => {
                    log::info!("[Auth] session for {}", user.username);
                    auth.user.set(Some(user));
                }
                Err(err) => {
                    log::debug!("[Auth] no session: {}", err);
                    auth.user.set(None);
                }
            }
            auth.loading.set(false);
        });
    }

    pub async fn login(&self, api: &Api, username: &str, password: &str) -> Result<(), ApiError> {
        api.login(username, password).await?;
        let user = api.me().await?;
        log::info!("[Auth] logged in as {}", user.username);
        self.user.set(Some(user));
        self.loading.set(false);
        Ok(())
    }

    /// Ends the session even if the backend call fails
    pub async fn logout(&self, api: &Api, queries: &QueryClient) {
        if let Err(err) = api.logout().await {
            log::warn!("[Auth] logout request failed: {}", err);
        }
        queries.on_logout();
        self.user.set(None);
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
