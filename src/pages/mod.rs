//! Routed Pages

mod admin;
mod admin_audit;
mod admin_users;
mod dashboard;
mod inventory;
mod inventory_tabs;
mod login;
mod logs;
mod procurement;
mod stale;

pub use admin::AdminPage;
pub use admin_audit::AdminAuditPage;
pub use admin_users::AdminUsersPage;
pub use dashboard::DashboardPage;
pub use inventory::InventoryPage;
pub use inventory_tabs::InventoryTabsPage;
pub use login::LoginPage;
pub use logs::LogsPage;
pub use procurement::ProcurementPage;
pub use stale::StalePage;
