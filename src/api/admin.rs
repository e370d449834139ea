//! User Administration Endpoints

use super::client::{ApiClient, QueryParams, Transport};
use super::endpoints;
use super::error::ApiError;
use crate::models::{AdminStats, MessageResponse, NewUser, ReasonBody, User, UserList, UserUpdate};

impl<T: Transport> ApiClient<T> {
    pub async fn list_users(&self) -> Result<UserList, ApiError> {
        self.get(endpoints::ADMIN_USERS, QueryParams::new()).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.post(endpoints::ADMIN_USERS, QueryParams::new(), user)
            .await
    }

    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, ApiError> {
        self.put(&endpoints::admin_user_by_id(id), update).await
    }

    pub async fn delete_user(&self, id: &str, reason: &str) -> Result<MessageResponse, ApiError> {
        self.delete(&endpoints::admin_user_by_id(id), Some(&ReasonBody { reason }))
            .await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get(endpoints::ADMIN_STATS, QueryParams::new()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::client::Method;
    use crate::api::mock::mock_client;
    use crate::models::{NewUser, Permission, Role, UserUpdate};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_users() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({
            "users": [{"id": "u1", "username": "dana", "role": "admin", "is_active": true,
                       "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-01T00:00:00"}],
            "total": 1
        }));

        let list = api.list_users().await.unwrap();
        assert_eq!(list.users[0].role, Role::Admin);
        assert_eq!(mock.last_request().path, "/admin/users");
    }

    #[tokio::test]
    async fn test_create_user_body() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"id": "u2", "username": "avi", "role": "user", "is_active": true}));

        api.create_user(&NewUser {
            username: "avi".into(),
            password: "pass".into(),
            role: Role::User,
            permissions: vec![Permission::InventoryRead],
        })
        .await
        .unwrap();

        assert_eq!(
            mock.last_request().json(),
            Some(&json!({"username": "avi", "password": "pass", "role": "user", "permissions": ["inventory:ro"]}))
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"id": "u1", "username": "dana", "role": "user", "is_active": false}));

        let update = UserUpdate { is_active: Some(false), ..Default::default() };
        let user = api.update_user("u1", &update).await.unwrap();
        assert!(!user.is_active);
        let req = mock.last_request();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.path, "/admin/users/u1");

        mock.reply(200, json!({"message": "deleted"}));
        api.delete_user("u1", "left company").await.unwrap();
        let req = mock.last_request();
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.json(), Some(&json!({"reason": "left company"})));
    }

    #[tokio::test]
    async fn test_admin_stats() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"total_users": 5, "active_users": 4, "inactive_users": 1}));
        let stats = api.admin_stats().await.unwrap();
        assert_eq!(stats.inactive_users, 1);
        assert_eq!(mock.last_request().path, "/admin/stats");
    }
}
