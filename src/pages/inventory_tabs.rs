//! Inventory Tabs Page
//!
//! Current stock, stale items and item activity under one route. The open
//! tab lives in the `tab` query parameter so it survives reloads.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use super::{InventoryPage, LogsPage, StalePage};

pub const TAB_PARAM: &str = "tab";
const INVENTORY_PATH: &str = "/inventory";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryTab {
    Current,
    Stale,
    Logs,
}

impl InventoryTab {
    pub const ALL: [InventoryTab; 3] = [InventoryTab::Current, InventoryTab::Stale, InventoryTab::Logs];

    /// Unknown or missing values open the current stock
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("stale") => InventoryTab::Stale,
            Some("logs") => InventoryTab::Logs,
            _ => InventoryTab::Current,
        }
    }

    pub fn param(self) -> &'static str {
        match self {
            InventoryTab::Current => "current",
            InventoryTab::Stale => "stale",
            InventoryTab::Logs => "logs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InventoryTab::Current => "מלאי נוכחי",
            InventoryTab::Stale => "מלאי ישן",
            InventoryTab::Logs => "תנועות",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            InventoryTab::Current => "📦",
            InventoryTab::Stale => "🕒",
            InventoryTab::Logs => "📈",
        }
    }

    pub fn href(self) -> String {
        format!("{}?{}={}", INVENTORY_PATH, TAB_PARAM, self.param())
    }
}

#[component]
pub fn InventoryTabsPage() -> impl IntoView {
    let query = use_query_map();
    let navigate = use_navigate();
    let active = Memo::new(move |_| query.with(|q| InventoryTab::from_param(q.get(TAB_PARAM).as_deref())));

    let buttons = InventoryTab::ALL
        .into_iter()
        .map(|tab| {
            let navigate = navigate.clone();
            view! {
                <button
                    class=move || if active.get() == tab { "tab-btn active" } else { "tab-btn" }
                    on:click=move |_| navigate(&tab.href(), Default::default())
                >
                    <span class="tab-icon">{tab.icon()}</span>
                    {tab.label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="inventory-tabbed-page">
            <div class="access-tabs">{buttons}</div>
            <div class="inventory-tab-content">
                {move || match active.get() {
                    InventoryTab::Current => view! { <InventoryPage /> }.into_any(),
                    InventoryTab::Stale => view! { <StalePage /> }.into_any(),
                    InventoryTab::Logs => view! { <LogsPage /> }.into_any(),
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_from_param() {
        assert_eq!(InventoryTab::from_param(Some("stale")), InventoryTab::Stale);
        assert_eq!(InventoryTab::from_param(Some("logs")), InventoryTab::Logs);
        assert_eq!(InventoryTab::from_param(Some("current")), InventoryTab::Current);
        assert_eq!(InventoryTab::from_param(Some("bogus")), InventoryTab::Current);
        assert_eq!(InventoryTab::from_param(None), InventoryTab::Current);
    }

    #[test]
    fn test_tab_href_round_trips() {
        for tab in InventoryTab::ALL {
            assert_eq!(InventoryTab::from_param(Some(tab.param())), tab);
        }
        assert_eq!(InventoryTab::Stale.href(), "/inventory?tab=stale");
    }
}
