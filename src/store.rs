//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::ApiError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Visible notifications, oldest first
    pub toasts: Vec<Toast>,
    pub next_toast_id: u32,
    /// How long a toast stays up
    pub toast_ms: u64,
}

impl AppState {
    pub fn new(toast_ms: u64) -> Self {
        Self {
            toast_ms,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Show a toast and schedule its removal
pub fn store_push_toast(store: &AppStore, kind: ToastKind, message: impl Into<String>) {
    let id = {
        let next_toast_id = store.next_toast_id();
        let mut next = next_toast_id.write();
        *next += 1;
        *next
    };
    store.toasts().write().push(Toast {
        id,
        kind,
        message: message.into(),
    });

    let store = *store;
    let ms = store.toast_ms().get_untracked();
    spawn_local(async move {
        gloo_timers::future::sleep(Duration::from_millis(ms)).await;
        store_dismiss_toast(&store, id);
    });
}

pub fn store_dismiss_toast(store: &AppStore, id: u32) {
    store.toasts().write().retain(|t| t.id != id);
}

pub fn toast_success(store: &AppStore, message: impl Into<String>) {
    store_push_toast(store, ToastKind::Success, message);
}

pub fn toast_info(store: &AppStore, message: impl Into<String>) {
    store_push_toast(store, ToastKind::Info, message);
}

/// Error toast with the user-facing text for `err`
pub fn toast_error(store: &AppStore, err: &ApiError) {
    store_push_toast(store, ToastKind::Error, err.user_message());
}

pub fn toast_warning(store: &AppStore, message: impl Into<String>) {
    store_push_toast(store, ToastKind::Warning, message);
}
