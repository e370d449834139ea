//! UI Components
//!
//! Reusable Leptos components.

mod bar_chart;
mod bulk_edit_modal;
mod context_menu;
mod delete_reason_modal;
mod excel_panel;
mod grid_overlays;
mod group_form;
mod guards;
mod header;
mod item_table;
pub mod log_timeline;
mod login_form;
mod modal;
mod pager;
mod permission_selector;
mod procurement_files;
mod procurement_history;
mod procurement_modal;
mod stat_card;
mod toast;
mod user_form;

pub use bar_chart::{BarChart, TimelineChart};
pub use bulk_edit_modal::BulkEditModal;
pub use context_menu::{toggle_menu, ContextMenu, MenuPosition};
pub use delete_reason_modal::DeleteReasonModal;
pub use excel_panel::ExcelPanel;
pub use grid_overlays::{FloatingToolbar, SelectionIndicator};
pub use group_form::GroupForm;
pub use guards::{AdminRoute, PermissionRoute, PrivateRoute, Spinner, HOME_PATH};
pub use header::Header;
pub use item_table::{ItemTable, SortState};
pub use log_timeline::LogTimeline;
pub use login_form::LoginForm;
pub use modal::Modal;
pub use pager::Pager;
pub use permission_selector::PermissionSelector;
pub use procurement_files::ProcurementFiles;
pub use procurement_history::ProcurementHistory;
pub use procurement_modal::ProcurementModal;
pub use stat_card::{ChartCard, StatCard};
pub use toast::ToastHost;
pub use user_form::UserForm;
