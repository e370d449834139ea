//! Application Configuration
//!
//! Defaults, build-time env overrides and the optional runtime object
//! `window.__WAREHOUSE_CONFIG__` served next to `index.html`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::api::retry::RetryPolicy;

const RUNTIME_CONFIG_KEY: &str = "__WAREHOUSE_CONFIG__";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend base URL, relative or absolute
    pub api_base_url: String,
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
    pub query_stale_ms: u64,
    pub cache_max_bytes: usize,
    pub retry: RetryPolicy,
    pub max_edit_history: usize,
    pub max_delete_history: usize,
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    /// Options for the item `target_site` column
    pub target_sites: Vec<String>,
    pub toast_ms: u64,
    pub filter_debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api".to_string(),
            log_level: "info".to_string(),
            query_stale_ms: 5 * 60 * 1000,
            cache_max_bytes: 10 * 1024 * 1024,
            retry: RetryPolicy::default(),
            max_edit_history: 20,
            max_delete_history: 10,
            default_page_size: 25,
            page_size_options: vec![10, 20, 30, 50, 100],
            target_sites: Vec::new(),
            toast_ms: 3000,
            filter_debounce_ms: 500,
        }
    }
}

impl AppConfig {
    /// Defaults plus build-time env, then runtime overrides from `window`
    pub fn load() -> Self {
        let mut config = Self::from_build_env(option_env!("WAREHOUSE_API_URL"));
        if let Some(overrides) = read_runtime_overrides() {
            config = config.merged(&overrides);
        }
        config
    }

    pub fn from_build_env(api_url: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        config
    }

    /// Apply a partial JSON object over this config. Unknown keys are
    /// ignored; an override that does not fit its field leaves the config
    /// unchanged.
    pub fn merged(&self, overrides: &Value) -> Self {
        let Some(patch) = overrides.as_object() else {
            return self.clone();
        };
        let Ok(Value::Object(mut base)) = serde_json::to_value(self) else {
            return self.clone();
        };
        for (key, value) in patch {
            if base.contains_key(key) {
                base.insert(key.clone(), value.clone());
            }
        }
        match serde_json::from_value(Value::Object(base)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("[Config] Ignoring runtime overrides: {}", e);
                self.clone()
            }
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

fn read_runtime_overrides() -> Option<Value> {
    let window = web_sys::window()?;
    let raw = js_sys::Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_KEY)).ok()?;
    if raw.is_undefined() || raw.is_null() {
        return None;
    }
    serde_wasm_bindgen::from_value(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "/api");
        assert_eq!(config.max_edit_history, 20);
        assert_eq!(config.max_delete_history, 10);
        assert_eq!(config.page_size_options, vec![10, 20, 30, 50, 100]);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_build_env_overrides_base_url() {
        assert_eq!(AppConfig::from_build_env(Some("https://wh.local/api")).api_base_url, "https://wh.local/api");
        assert_eq!(AppConfig::from_build_env(Some("  ")).api_base_url, "/api");
        assert_eq!(AppConfig::from_build_env(None).api_base_url, "/api");
    }

    #[test]
    fn test_partial_overrides_keep_other_values() {
        let base = AppConfig::from_build_env(Some("http://backend:8000"));
        let merged = base.merged(&json!({
            "target_sites": ["Site A", "Site B"],
            "toast_ms": 5000,
            "unknown_key": true
        }));

        assert_eq!(merged.target_sites, vec!["Site A", "Site B"]);
        assert_eq!(merged.toast_ms, 5000);
        assert_eq!(merged.api_base_url, "http://backend:8000");
        assert_eq!(merged.default_page_size, 25);
    }

    #[test]
    fn test_bad_override_is_ignored() {
        let base = AppConfig::default();
        assert_eq!(base.merged(&json!({"toast_ms": "soon"})), base);
        assert_eq!(base.merged(&json!(["not", "an", "object"])), base);
    }

    #[test]
    fn test_level_filter() {
        let mut config = AppConfig::default();
        config.log_level = "debug".into();
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
        config.log_level = "loud".into();
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }
}
