//! Backend Paths
//!
//! Relative to `AppConfig::api_base_url`. Dynamic segments are
//! percent-encoded.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

// ========================
// Auth
// ========================

pub const LOGIN: &str = "/auth/login";
pub const DOMAIN_LOGIN: &str = "/auth/domain-login";
pub const LOGOUT: &str = "/auth/logout";
pub const ME: &str = "/auth/me";
pub const CHANGE_PASSWORD: &str = "/auth/password";

// ========================
// Items
// ========================

pub const ITEMS: &str = "/items";
pub const BULK_UPDATE: &str = "/items/bulk-update";
pub const BULK_DELETE: &str = "/items/bulk-delete";
pub const DELETE_ALL: &str = "/items/delete-all";
pub const ITEM_STATISTICS: &str = "/items/statistics";
pub const STALE_ITEMS: &str = "/items/stale";

pub fn item_by_id(id: &str) -> String {
    format!("/items/{}", segment(id))
}

// ========================
// Excel
// ========================

pub const IMPORT_EXCEL: &str = "/items/import-excel";
pub const IMPORT_PROJECTS: &str = "/items/import-projects";
pub const EXPORT_EXCEL: &str = "/items/export-excel";

// ========================
// Audit / logs
// ========================

pub const AUDIT_LOGS: &str = "/audit/logs";

pub fn audit_user_activity(username: &str) -> String {
    format!("/audit/users/{}", segment(username))
}

// ========================
// Analytics
// ========================

pub const ANALYTICS: &str = "/analytics/dashboard";
pub const ANALYTICS_ACTIVITY: &str = "/analytics/activity";
pub const ANALYTICS_TIMELINE: &str = "/analytics/timeline";

pub fn analytics_item(catalog_number: &str) -> String {
    format!("/analytics/item/{}", segment(catalog_number))
}

// ========================
// Admin
// ========================

pub const ADMIN_USERS: &str = "/admin/users";
pub const ADMIN_STATS: &str = "/admin/stats";
pub const ADMIN_GROUPS: &str = "/admin/groups";

pub fn admin_user_by_id(id: &str) -> String {
    format!("/admin/users/{}", segment(id))
}

pub fn admin_group_by_id(id: &str) -> String {
    format!("/admin/groups/{}", segment(id))
}

// ========================
// Procurement
// ========================

pub const PROCUREMENT_ORDERS: &str = "/procurement/orders";

pub fn procurement_order_by_id(id: &str) -> String {
    format!("/procurement/orders/{}", segment(id))
}

pub fn procurement_files(order_id: &str) -> String {
    format!("/procurement/orders/{}/files", segment(order_id))
}

pub fn procurement_file_by_id(order_id: &str, file_id: &str) -> String {
    format!(
        "/procurement/orders/{}/files/{}",
        segment(order_id),
        segment(file_id)
    )
}
