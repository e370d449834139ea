use serde::{Deserialize, Serialize};

use super::lenient_string;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Superadmin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Superadmin => "מנהל על",
            Role::Admin => "מנהל",
            Role::User => "משתמש",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "superadmin" => Role::Superadmin,
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "inventory:ro")]
    InventoryRead,
    #[serde(rename = "inventory:rw")]
    InventoryWrite,
    #[serde(rename = "procurement:ro")]
    ProcurementRead,
    #[serde(rename = "procurement:rw")]
    ProcurementWrite,
    #[serde(rename = "admin")]
    Admin,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::InventoryRead,
        Permission::InventoryWrite,
        Permission::ProcurementRead,
        Permission::ProcurementWrite,
        Permission::Admin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::InventoryRead => "inventory:ro",
            Permission::InventoryWrite => "inventory:rw",
            Permission::ProcurementRead => "procurement:ro",
            Permission::ProcurementWrite => "procurement:rw",
            Permission::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            Permission::InventoryRead => "מלאי - צפייה",
            Permission::InventoryWrite => "מלאי - עריכה",
            Permission::ProcurementRead => "רכש - צפייה",
            Permission::ProcurementWrite => "רכש - עריכה",
            Permission::Admin => "ניהול",
        }
    }

    /// The `:rw` permission that also grants this `:ro` one
    pub fn write_variant(self) -> Option<Self> {
        match self {
            Permission::InventoryRead => Some(Permission::InventoryWrite),
            Permission::ProcurementRead => Some(Permission::ProcurementWrite),
            _ => None,
        }
    }
}

/// Unknown permission strings from the backend are dropped
fn permission_list<'de, D>(deserializer: D) -> Result<Vec<Permission>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.iter().filter_map(|s| Permission::parse(s)).collect())
}

/// Session user from `/auth/me`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "permission_list")]
    pub permissions: Vec<Permission>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
}

impl CurrentUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::Superadmin
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Superadmin)
            || self.permissions.contains(&Permission::Admin)
    }

    /// Exact grant; superadmins hold every permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.is_super_admin() || self.permissions.contains(&permission)
    }

    /// Like [`has_permission`](Self::has_permission), but a `:ro` request is
    /// also satisfied by the matching `:rw` grant
    pub fn can_access(&self, permission: Permission) -> bool {
        self.has_permission(permission)
            || permission
                .write_variant()
                .is_some_and(|rw| self.has_permission(rw))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "permission_list")]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Partial user update; unset fields are left alone
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub inactive_users: u64,
    #[serde(default)]
    pub superadmins: u64,
    #[serde(default)]
    pub admins: u64,
    #[serde(default)]
    pub regular_users: u64,
}

// ========================
// Groups
// ========================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "permission_list")]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupList {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewGroup {
    pub name: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_user_from_me() {
        let me: CurrentUser = serde_json::from_value(json!({
            "username": "dana",
            "role": "admin",
            "permissions": ["inventory:rw", "reports:x"],
            "user_id": null
        }))
        .unwrap();
        assert_eq!(me.role, Role::Admin);
        assert_eq!(me.permissions, vec![Permission::InventoryWrite]);
    }

    #[test]
    fn test_unknown_role_is_user() {
        let me: CurrentUser = serde_json::from_value(json!({"username": "x", "role": "guest"})).unwrap();
        assert_eq!(me.role, Role::User);
        assert!(me.permissions.is_empty());
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let body = serde_json::to_value(UserUpdate {
            is_active: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"is_active": false}));
    }

    #[test]
    fn test_permission_wire_names() {
        assert_eq!(serde_json::to_value(Permission::ProcurementRead).unwrap(), json!("procurement:ro"));
        assert_eq!(Permission::parse("admin"), Some(Permission::Admin));
        assert_eq!(Permission::InventoryRead.write_variant(), Some(Permission::InventoryWrite));
        assert_eq!(Permission::Admin.write_variant(), None);
    }

    fn user(role: Role, permissions: Vec<Permission>) -> CurrentUser {
        CurrentUser {
            username: "u".into(),
            role,
            permissions,
            user_id: None,
        }
    }

    #[test]
    fn test_admin_by_role_or_permission() {
        assert!(user(Role::Admin, vec![]).is_admin());
        assert!(user(Role::Superadmin, vec![]).is_admin());
        assert!(user(Role::User, vec![Permission::Admin]).is_admin());
        assert!(!user(Role::User, vec![Permission::InventoryWrite]).is_admin());
        assert!(!user(Role::Admin, vec![]).is_super_admin());
    }

    #[test]
    fn test_superadmin_has_everything() {
        let root = user(Role::Superadmin, vec![]);
        assert!(Permission::ALL.iter().all(|p| root.has_permission(*p)));
    }

    #[test]
    fn test_read_access_through_write_grant() {
        let writer = user(Role::User, vec![Permission::InventoryWrite]);
        assert!(writer.can_access(Permission::InventoryRead));
        assert!(writer.can_access(Permission::InventoryWrite));
        assert!(!writer.has_permission(Permission::InventoryRead));
        assert!(!writer.can_access(Permission::ProcurementRead));

        let reader = user(Role::User, vec![Permission::ProcurementRead]);
        assert!(!reader.can_access(Permission::ProcurementWrite));
    }
}
