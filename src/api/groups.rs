//! Group Endpoints

use super::client::{ApiClient, QueryParams, Transport};
use super::endpoints;
use super::error::ApiError;
use crate::models::{Group, GroupList, GroupUpdate, MessageResponse, NewGroup, ReasonBody};

impl<T: Transport> ApiClient<T> {
    pub async fn list_groups(&self) -> Result<GroupList, ApiError> {
        self.get(endpoints::ADMIN_GROUPS, QueryParams::new()).await
    }

    pub async fn create_group(&self, group: &NewGroup) -> Result<Group, ApiError> {
        self.post(endpoints::ADMIN_GROUPS, QueryParams::new(), group)
            .await
    }

    pub async fn update_group(&self, id: &str, update: &GroupUpdate) -> Result<Group, ApiError> {
        self.put(&endpoints::admin_group_by_id(id), update).await
    }

    pub async fn delete_group(&self, id: &str, reason: &str) -> Result<MessageResponse, ApiError> {
        self.delete(&endpoints::admin_group_by_id(id), Some(&ReasonBody { reason }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::client::Method;
    use crate::api::mock::mock_client;
    use crate::models::{GroupUpdate, NewGroup, Permission, Role};
    use serde_json::json;

    #[tokio::test]
    async fn test_group_crud_requests() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"groups": [{"id": "g1", "name": "Lab", "permissions": ["procurement:rw"], "is_active": true}], "total": 1}));
        let list = api.list_groups().await.unwrap();
        assert_eq!(list.groups[0].permissions, vec![Permission::ProcurementWrite]);

        mock.reply(200, json!({"id": "g2", "name": "Store", "is_active": true}));
        api.create_group(&NewGroup { name: "Store".into(), role: Role::User, permissions: vec![] })
            .await
            .unwrap();
        assert_eq!(
            mock.last_request().json(),
            Some(&json!({"name": "Store", "role": "user", "permissions": []}))
        );

        mock.reply(200, json!({"id": "g2", "name": "Stores", "is_active": true}));
        api.update_group("g2", &GroupUpdate { name: Some("Stores".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(mock.last_request().json(), Some(&json!({"name": "Stores"})));

        api.delete_group("g2", "merged").await.unwrap_or_default();
        let req = mock.last_request();
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.path, "/admin/groups/g2");
        assert_eq!(req.json(), Some(&json!({"reason": "merged"})));
    }
}
