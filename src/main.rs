//! Warehouse Frontend Entry Point

mod api;
mod app;
mod browser;
mod cache;
mod column_widths;
mod components;
mod config;
mod context;
mod debounce;
mod editing;
mod format;
mod logger;
mod models;
mod pages;
mod pagination;
mod query;
mod store;
mod undo;
mod validate;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = AppConfig::load();
    logger::init(config.level_filter());
    log::info!("[App] starting against {}", config.api_base_url);
    mount_to_body(move || view! { <App config=config.clone() /> });
}
