use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Audited action names as the backend stores them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    UserCreate,
    UserUpdate,
    UserDelete,
    UserLogin,
    UserLogout,
    PasswordChange,
    RoleChange,
    GroupCreate,
    GroupUpdate,
    GroupDelete,
    ProcurementCreate,
    ProcurementUpdate,
    ProcurementDelete,
    ProcurementFileUpload,
    ProcurementFileDelete,
    ItemCreate,
    ItemUpdate,
    ItemDelete,
    ItemBulkUpdate,
    ItemBulkDelete,
    ItemImport,
    Undo,
}

impl AuditAction {
    pub const ALL: [AuditAction; 22] = [
        AuditAction::UserCreate,
        AuditAction::UserUpdate,
        AuditAction::UserDelete,
        AuditAction::UserLogin,
        AuditAction::UserLogout,
        AuditAction::PasswordChange,
        AuditAction::RoleChange,
        AuditAction::GroupCreate,
        AuditAction::GroupUpdate,
        AuditAction::GroupDelete,
        AuditAction::ProcurementCreate,
        AuditAction::ProcurementUpdate,
        AuditAction::ProcurementDelete,
        AuditAction::ProcurementFileUpload,
        AuditAction::ProcurementFileDelete,
        AuditAction::ItemCreate,
        AuditAction::ItemUpdate,
        AuditAction::ItemDelete,
        AuditAction::ItemBulkUpdate,
        AuditAction::ItemBulkDelete,
        AuditAction::ItemImport,
        AuditAction::Undo,
    ];

    /// Actions shown on the inventory activity page
    pub const ITEM_ACTIONS: [AuditAction; 7] = [
        AuditAction::ItemCreate,
        AuditAction::ItemUpdate,
        AuditAction::ItemDelete,
        AuditAction::ItemBulkUpdate,
        AuditAction::ItemBulkDelete,
        AuditAction::ItemImport,
        AuditAction::Undo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserCreate => "user_create",
            AuditAction::UserUpdate => "user_update",
            AuditAction::UserDelete => "user_delete",
            AuditAction::UserLogin => "user_login",
            AuditAction::UserLogout => "user_logout",
            AuditAction::PasswordChange => "password_change",
            AuditAction::RoleChange => "role_change",
            AuditAction::GroupCreate => "group_create",
            AuditAction::GroupUpdate => "group_update",
            AuditAction::GroupDelete => "group_delete",
            AuditAction::ProcurementCreate => "procurement_create",
            AuditAction::ProcurementUpdate => "procurement_update",
            AuditAction::ProcurementDelete => "procurement_delete",
            AuditAction::ProcurementFileUpload => "procurement_file_upload",
            AuditAction::ProcurementFileDelete => "procurement_file_delete",
            AuditAction::ItemCreate => "item_create",
            AuditAction::ItemUpdate => "item_update",
            AuditAction::ItemDelete => "item_delete",
            AuditAction::ItemBulkUpdate => "item_bulk_update",
            AuditAction::ItemBulkDelete => "item_bulk_delete",
            AuditAction::ItemImport => "item_import",
            AuditAction::Undo => "undo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

/// Display label for a stored action string, falling back to the raw name
pub fn action_label(action: &str) -> &str {
    match action {
        "create" => "יצירה",
        "update" => "עדכון",
        "delete" => "מחיקה",
        "bulk_update" => "עדכון מרובה",
        "bulk_delete" => "מחיקה מרובה",
        "delete_all" => "מחיקת הכל",
        "import" => "יבוא",
        "undo" => "ביטול פעולה",
        "item_create" => "יצירת פריט",
        "item_update" => "עדכון פריט",
        "item_delete" => "מחיקת פריט",
        "item_bulk_update" => "עדכון פריט מרובה",
        "item_bulk_delete" => "מחיקת פריט מרובה",
        "item_import" => "יבוא פריטים",
        "user_create" => "יצירת משתמש",
        "user_update" => "עדכון משתמש",
        "user_delete" => "מחיקת משתמש",
        "user_login" => "התחברות",
        "user_logout" => "התנתקות",
        "password_change" => "שינוי סיסמה",
        "role_change" => "שינוי תפקיד",
        "group_create" => "יצירת קבוצה",
        "group_update" => "עדכון קבוצה",
        "group_delete" => "מחיקת קבוצה",
        "procurement_create" => "יצירת הזמנה",
        "procurement_update" => "עדכון הזמנה",
        "procurement_delete" => "מחיקת הזמנה",
        "procurement_file_upload" => "העלאת קובץ",
        "procurement_file_delete" => "מחיקת קובץ",
        other => other,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    /// Kept as a string so actions added on the backend still render
    pub action: String,
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub actor_role: String,
    #[serde(default)]
    pub target_user: Option<String>,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub target_resource: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub changes: Option<Value>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl AuditLogEntry {
    /// What the activity timeline shows as the affected item
    pub fn item_identifier(&self) -> String {
        match (&self.resource_id, &self.target_resource) {
            (Some(id), _) if !id.is_empty() => id.clone(),
            (_, Some(res)) if res == "item" => self.details.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLogPage {
    #[serde(default)]
    pub logs: Vec<AuditLogEntry>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
}

impl AuditLogPage {
    pub fn pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

/// Audit log filters; empty values are not sent
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AuditLogQuery {
    pub action: Option<String>,
    pub actor: Option<String>,
    pub target_user: Option<String>,
    pub target_resource: Option<String>,
    pub resource_id: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Body of `POST /audit/logs`, used to record undo operations
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewAuditLog {
    pub action: AuditAction,
    pub actor: String,
    pub actor_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedLog {
    #[serde(default)]
    pub log_id: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_identifier_fallbacks() {
        let mut entry = AuditLogEntry {
            resource_id: Some("64f".into()),
            ..Default::default()
        };
        assert_eq!(entry.item_identifier(), "64f");

        entry.resource_id = None;
        entry.target_resource = Some("item".into());
        entry.details = Some("SN-9".into());
        assert_eq!(entry.item_identifier(), "SN-9");

        entry.target_resource = Some("user".into());
        assert_eq!(entry.item_identifier(), "");
    }

    #[test]
    fn test_pages_rounds_up() {
        let page = AuditLogPage { total: 101, page_size: 50, ..Default::default() };
        assert_eq!(page.pages(), 3);
        assert_eq!(AuditLogPage::default().pages(), 0);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(serde_json::to_value(AuditAction::ItemBulkDelete).unwrap(), json!("item_bulk_delete"));
        assert_eq!(AuditAction::parse("undo"), Some(AuditAction::Undo));
        assert_eq!(action_label("item_update"), "עדכון פריט");
        assert_eq!(action_label("future_action"), "future_action");
    }
}
