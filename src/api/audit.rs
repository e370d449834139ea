//! Audit Log Endpoints

use super::client::{ApiClient, QueryParams, Transport};
use super::endpoints;
use super::error::ApiError;
use crate::models::{AuditLogPage, AuditLogQuery};

fn audit_params(query: &AuditLogQuery) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push_non_empty("action", query.action.as_deref())
        .push_non_empty("actor", query.actor.as_deref())
        .push_non_empty("target_user", query.target_user.as_deref())
        .push_non_empty("target_resource", query.target_resource.as_deref())
        .push_non_empty("resource_id", query.resource_id.as_deref())
        .push_non_empty("search", query.search.as_deref())
        .push_non_empty("start_date", query.start_date.as_deref())
        .push_non_empty("end_date", query.end_date.as_deref())
        .push_opt("page", query.page)
        .push_opt("page_size", query.page_size);
    params
}

impl<T: Transport> ApiClient<T> {
    pub async fn audit_logs(&self, query: &AuditLogQuery) -> Result<AuditLogPage, ApiError> {
        self.get(endpoints::AUDIT_LOGS, audit_params(query)).await
    }

    pub async fn user_activity(
        &self,
        username: &str,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<AuditLogPage, ApiError> {
        let mut params = QueryParams::new();
        params.push_opt("page", page).push_opt("page_size", page_size);
        self.get(&endpoints::audit_user_activity(username), params)
            .await
    }

    /// History of one resource, e.g. a procurement order
    pub async fn resource_logs(
        &self,
        resource: &str,
        resource_id: &str,
        mut query: AuditLogQuery,
    ) -> Result<AuditLogPage, ApiError> {
        query.target_resource = Some(resource.to_string());
        query.resource_id = Some(resource_id.to_string());
        self.audit_logs(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::mock_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_filters_skip_empty_values() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({
            "logs": [{"id": "1", "timestamp": "2024-05-01T10:00:00", "action": "user_create", "actor": "root", "actor_role": "superadmin"}],
            "total": 1, "page": 1, "page_size": 50
        }));

        let query = AuditLogQuery {
            action: Some("user_create".into()),
            actor: Some(String::new()),
            start_date: Some("2024-05-01".into()),
            page: Some(1),
            ..Default::default()
        };
        let page = api.audit_logs(&query).await.unwrap();

        assert_eq!(page.logs[0].actor, "root");
        let req = mock.last_request();
        assert_eq!(req.query.get("action"), Some("user_create"));
        assert!(!req.query.contains("actor"));
        assert_eq!(req.query.get("start_date"), Some("2024-05-01"));
    }

    #[tokio::test]
    async fn test_user_activity_path() {
        let (api, mock) = mock_client();
        let _ = api.user_activity("dana k", Some(2), None).await;
        let req = mock.last_request();
        assert_eq!(req.path, "/audit/users/dana%20k");
        assert_eq!(req.query.get("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_resource_logs_sets_target() {
        let (api, mock) = mock_client();
        let _ = api
            .resource_logs("procurement_order", "o1", AuditLogQuery::default())
            .await;
        let req = mock.last_request();
        assert_eq!(req.query.get("target_resource"), Some("procurement_order"));
        assert_eq!(req.query.get("resource_id"), Some("o1"));
    }
}
