//! Inventory Activity Log
//!
//! The item-scoped view of the audit log, plus the undo records the client
//! writes itself.

use serde_json::Value;

use super::client::{ApiClient, QueryParams, Transport};
use super::endpoints;
use super::error::ApiError;
use crate::models::{AuditAction, AuditLogPage, CreatedLog, NewAuditLog};

const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ActivityQuery {
    pub page: Option<u64>,
    /// Sent as `page_size`
    pub limit: Option<u64>,
    pub action: Option<String>,
    pub search: Option<String>,
}

/// An undo the user performed, recorded for traceability
#[derive(Clone, Debug, PartialEq)]
pub struct UndoRecord {
    pub user: String,
    pub actor_role: Option<String>,
    pub resource_id: Option<String>,
    pub changes: Value,
    pub details: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    pub async fn activity_logs(&self, query: &ActivityQuery) -> Result<AuditLogPage, ApiError> {
        let mut params = QueryParams::new();
        params
            .push_opt("page", query.page)
            .push("page_size", query.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push("target_resource", "item")
            .push_non_empty("action", query.action.as_deref())
            .push_non_empty("search", query.search.as_deref());
        self.get(endpoints::AUDIT_LOGS, params).await
    }

    pub async fn record_undo(&self, record: &UndoRecord) -> Result<CreatedLog, ApiError> {
        let body = NewAuditLog {
            action: AuditAction::Undo,
            actor: record.user.clone(),
            actor_role: record
                .actor_role
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            target_resource: Some("item".to_string()),
            resource_id: record.resource_id.clone(),
            changes: Some(record.changes.clone()),
            reason: None,
            details: record.details.clone(),
        };
        self.post(endpoints::AUDIT_LOGS, QueryParams::new(), &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::mock_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_limit_maps_to_page_size() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"logs": [], "total": 0, "page": 1, "page_size": 20}));

        let query = ActivityQuery { page: Some(1), limit: Some(20), ..Default::default() };
        api.activity_logs(&query).await.unwrap();

        let req = mock.last_request();
        assert_eq!(req.path, "/audit/logs");
        assert_eq!(req.query.get("page_size"), Some("20"));
        assert!(!req.query.contains("limit"));
        assert_eq!(req.query.get("target_resource"), Some("item"));
    }

    #[tokio::test]
    async fn test_default_page_size() {
        let (api, mock) = mock_client();
        let _ = api.activity_logs(&ActivityQuery::default()).await;
        assert_eq!(mock.last_request().query.get("page_size"), Some("50"));
    }

    #[tokio::test]
    async fn test_undo_record_maps_user_to_actor() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"log_id": "L1", "status": "created"}));

        let created = api
            .record_undo(&UndoRecord {
                user: "dana".into(),
                actor_role: None,
                resource_id: Some("i1".into()),
                changes: json!({"type": "edit", "field": "notes", "from": "b", "to": "a"}),
                details: None,
            })
            .await
            .unwrap();

        assert_eq!(created.log_id, "L1");
        let body = mock.last_request().json().cloned().unwrap();
        assert_eq!(body["action"], json!("undo"));
        assert_eq!(body["actor"], json!("dana"));
        assert_eq!(body["actor_role"], json!("unknown"));
        assert_eq!(body["changes"]["field"], json!("notes"));
    }
}
