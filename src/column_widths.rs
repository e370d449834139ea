//! Column Widths
//!
//! User-resized grid column widths, kept in local storage. Columns that
//! were never resized use a per-field default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::browser;

pub const STORAGE_KEY: &str = "inventory-column-widths";
pub const MIN_WIDTH: u32 = 60;

pub fn default_width(key: &str) -> u32 {
    match key {
        "serial" | "catalog_number" | "warranty_expiry" => 120,
        "location" => 140,
        "current_stock" | "reserved_stock" => 90,
        "purpose" => 200,
        "description" | "notes" => 250,
        _ => 150,
    }
}

/// Width after dragging a column edge from `start_x` to `x`. The grid is
/// right-to-left, so moving left widens the column.
pub fn resized_width(start_width: u32, start_x: i32, x: i32) -> u32 {
    let width = i64::from(start_width) + i64::from(start_x) - i64::from(x);
    width.clamp(i64::from(MIN_WIDTH), i64::from(u32::MAX)) as u32
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnWidths(BTreeMap<String, u32>);

impl ColumnWidths {
    /// Saved widths; unreadable data counts as nothing saved
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            log::warn!("[Columns] ignoring saved widths: {}", e);
            Self::default()
        })
    }

    pub fn load() -> Self {
        browser::local_get(STORAGE_KEY)
            .map(|raw| Self::from_json(&raw))
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if self.0.is_empty() {
            browser::local_remove(STORAGE_KEY);
            return;
        }
        match serde_json::to_string(self) {
            Ok(raw) => browser::local_set(STORAGE_KEY, &raw),
            Err(e) => log::warn!("[Columns] not saving widths: {}", e),
        }
    }

    pub fn width(&self, key: &str) -> u32 {
        self.0.get(key).copied().unwrap_or_else(|| default_width(key))
    }

    pub fn set(&mut self, key: &str, width: u32) {
        self.0.insert(key.to_string(), width.max(MIN_WIDTH));
    }

    /// Back to the default width
    pub fn reset(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn is_customized(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// A drag in progress on a column edge
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeDrag {
    pub field: String,
    pub start_x: i32,
    pub start_width: u32,
}

impl ResizeDrag {
    pub fn width_at(&self, x: i32) -> u32 {
        resized_width(self.start_width, self.start_x, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_field() {
        let widths = ColumnWidths::default();
        assert_eq!(widths.width("serial"), 120);
        assert_eq!(widths.width("current_stock"), 90);
        assert_eq!(widths.width("description"), 250);
        assert_eq!(widths.width("target_site"), 150);
    }

    #[test]
    fn test_dragging_left_widens_in_rtl() {
        assert_eq!(resized_width(120, 500, 460), 160);
        assert_eq!(resized_width(120, 500, 530), 90);
        assert_eq!(resized_width(120, 500, 900), MIN_WIDTH);
    }

    #[test]
    fn test_set_and_reset() {
        let mut widths = ColumnWidths::default();
        widths.set("notes", 10);
        assert_eq!(widths.width("notes"), MIN_WIDTH);
        assert!(widths.is_customized("notes"));

        widths.reset("notes");
        assert_eq!(widths.width("notes"), 250);
        assert!(!widths.is_customized("notes"));
    }

    #[test]
    fn test_saved_json_is_a_flat_map() {
        let mut widths = ColumnWidths::default();
        widths.set("location", 200);
        assert_eq!(serde_json::to_string(&widths).unwrap(), r#"{"location":200}"#);

        let loaded = ColumnWidths::from_json(r#"{"location":200,"notes":300}"#);
        assert_eq!(loaded.width("notes"), 300);
        assert_eq!(ColumnWidths::from_json("not json"), ColumnWidths::default());
    }

    #[test]
    fn test_drag_uses_start_width() {
        let drag = ResizeDrag {
            field: "purpose".into(),
            start_x: 300,
            start_width: 200,
        };
        assert_eq!(drag.width_at(250), 250);
    }
}
