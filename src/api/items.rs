//! Item Endpoints

use serde::Serialize;
use serde_json::{Map, Value};

use super::client::{ApiClient, QueryParams, Transport};
use super::endpoints;
use super::error::ApiError;
use crate::models::{BulkResult, BulkUpdate, Item, ItemFields, ItemPage, ItemQuery, ReasonBody};

/// Column filters the list endpoint accepts
const FILTER_FIELDS: [&str; 11] = [
    "catalog_number",
    "manufacturer",
    "location",
    "description",
    "current_stock",
    "purpose",
    "notes",
    "target_site",
    "project_allocations",
    "warranty_expiry",
    "serial",
];

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct FieldUpdateArgs<'a> {
    field: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct IdsReasonArgs<'a> {
    ids: &'a [String],
    reason: &'a str,
}

/// Query parameters for item listing and export. Unknown filter keys and
/// empty values are dropped; `serial_number` travels as `serial`.
pub fn item_query_params(query: &ItemQuery) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push_non_empty("search", query.search.as_deref())
        .push_opt("page", query.page)
        .push_opt("limit", query.limit);

    for (field, value) in &query.filters {
        if FILTER_FIELDS.contains(&field.as_str()) && field != "serial" {
            params.push_non_empty(field, Some(value.as_str()));
        }
    }

    params
        .push_non_empty("sort_by", query.sort_by.as_deref())
        .push_opt("sort_order", query.sort_order.map(|o| o.as_str()));

    if let Some(serial) = query.filters.get("serial") {
        params.push_non_empty("serial", Some(serial.as_str()));
    }
    params
        .push_non_empty("serial", query.serial_number.as_deref())
        .push_non_empty("serial", query.serial.as_deref());
    params
}

fn undo_params(is_undo: bool) -> QueryParams {
    let mut params = QueryParams::new();
    if is_undo {
        params.push("is_undo", true);
    }
    params
}

fn bulk_update_body(ids: &[String], update: &BulkUpdate) -> Value {
    let mut body = Map::new();
    body.insert("ids".into(), Value::from(ids.to_vec()));
    match update {
        BulkUpdate::Field { field, value } => {
            body.insert("field".into(), Value::from(field.as_str()));
            body.insert("value".into(), Value::from(value.as_str()));
        }
        BulkUpdate::Fields {
            notes,
            purpose,
            target_site,
        } => {
            for (key, value) in [("notes", notes), ("purpose", purpose), ("target_site", target_site)] {
                if let Some(v) = value {
                    body.insert(key.into(), Value::from(v.as_str()));
                }
            }
        }
    }
    Value::Object(body)
}

// ========================
// Commands
// ========================

impl<T: Transport> ApiClient<T> {
    pub async fn list_items(&self, query: &ItemQuery) -> Result<ItemPage, ApiError> {
        self.get(endpoints::ITEMS, item_query_params(query)).await
    }

    pub async fn get_item(&self, id: &str) -> Result<Item, ApiError> {
        self.get(&endpoints::item_by_id(id), QueryParams::new()).await
    }

    /// `is_undo` tells the backend not to write its own audit entry
    pub async fn create_item(&self, fields: &ItemFields, is_undo: bool) -> Result<Item, ApiError> {
        self.post(endpoints::ITEMS, undo_params(is_undo), fields).await
    }

    pub async fn update_item(
        &self,
        id: &str,
        field: &str,
        value: &str,
        is_undo: bool,
    ) -> Result<Value, ApiError> {
        self.patch(
            &endpoints::item_by_id(id),
            undo_params(is_undo),
            &FieldUpdateArgs { field, value },
        )
        .await
    }

    pub async fn bulk_update(&self, ids: &[String], update: &BulkUpdate) -> Result<BulkResult, ApiError> {
        self.post(endpoints::BULK_UPDATE, QueryParams::new(), &bulk_update_body(ids, update))
            .await
    }

    pub async fn delete_item(&self, id: &str, reason: &str) -> Result<Value, ApiError> {
        self.delete(&endpoints::item_by_id(id), Some(&ReasonBody { reason }))
            .await
    }

    pub async fn bulk_delete(&self, ids: &[String], reason: &str) -> Result<BulkResult, ApiError> {
        self.post(endpoints::BULK_DELETE, QueryParams::new(), &IdsReasonArgs { ids, reason })
            .await
    }

    pub async fn delete_all_items(&self, reason: &str) -> Result<BulkResult, ApiError> {
        self.post(endpoints::DELETE_ALL, QueryParams::new(), &ReasonBody { reason })
            .await
    }

    pub async fn item_statistics(&self) -> Result<Value, ApiError> {
        self.get(endpoints::ITEM_STATISTICS, QueryParams::new()).await
    }

    /// Items not updated for `days` days
    pub async fn stale_items(&self, days: u32, page: u64, limit: u64) -> Result<ItemPage, ApiError> {
        let mut params = QueryParams::new();
        params.push("days", days).push("page", page).push("limit", limit);
        self.get(endpoints::STALE_ITEMS, params).await
    }

    /// Re-create deleted items as an undo. Failures are logged and skipped;
    /// the items that were restored are returned.
    pub async fn restore_items(&self, items: &[Item]) -> Vec<Item> {
        let mut restored = Vec::with_capacity(items.len());
        for item in items {
            match self.create_item(&item.fields, true).await {
                Ok(created) => restored.push(created),
                Err(e) => log::error!("[Items] Failed to restore item {}: {}", item.id, e),
            }
        }
        log::info!("[Items] Restored {}/{} items", restored.len(), items.len());
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::Method;
    use crate::api::mock::mock_client;
    use crate::models::SortOrder;
    use serde_json::json;

    fn item(id: &str, serial: &str) -> Item {
        Item {
            id: id.to_string(),
            fields: ItemFields {
                serial: Some(serial.to_string()),
                ..Default::default()
            },
            created_at: Some("2024-01-01T00:00:00".into()),
            updated_at: None,
        }
    }

    #[test]
    fn test_query_params_only_allowed_fields() {
        let mut query = ItemQuery::page(2, 25);
        query.search = Some(String::new());
        query.filters.insert("location".into(), "A-1".into());
        query.filters.insert("notes".into(), String::new());
        query.filters.insert("hacker".into(), "1".into());
        query.serial_number = Some("SN-1".into());

        let params = item_query_params(&query);
        assert!(!params.contains("search"));
        assert!(!params.contains("notes"));
        assert!(!params.contains("hacker"));
        assert_eq!(params.get("location"), Some("A-1"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("sort_by"), Some("updated_at"));
        assert_eq!(params.get("sort_order"), Some("desc"));
        assert_eq!(params.get_all("serial"), vec!["SN-1"]);
        assert!(!params.contains("serial_number"));
    }

    #[tokio::test]
    async fn test_list_items() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({
            "items": [{"_id": "a", "description": "Cable"}],
            "total": 1, "page": 1, "limit": 25, "pages": 1
        }));

        let mut query = ItemQuery::page(1, 25);
        query.sort_order = Some(SortOrder::Asc);
        let page = api.list_items(&query).await.unwrap();

        assert_eq!(page.items[0].id, "a");
        let req = mock.last_request();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/items");
        assert_eq!(req.query.get("sort_order"), Some("asc"));
    }

    #[tokio::test]
    async fn test_create_and_update_with_undo_flag() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"_id": "n1"}));

        api.create_item(&ItemFields::default(), true).await.unwrap();
        let req = mock.last_request();
        assert_eq!(req.path, "/items");
        assert_eq!(req.query.get("is_undo"), Some("true"));

        api.update_item("n1", "notes", "hello", false).await.unwrap();
        let req = mock.last_request();
        assert_eq!(req.method, Method::Patch);
        assert_eq!(req.path, "/items/n1");
        assert!(req.query.is_empty());
        assert_eq!(req.json(), Some(&json!({"field": "notes", "value": "hello"})));
    }

    #[tokio::test]
    async fn test_bulk_update_payload_shapes() {
        let (api, mock) = mock_client();
        let ids = vec!["a".to_string(), "b".to_string()];

        api.bulk_update(&ids, &BulkUpdate::Field { field: "location".into(), value: "B".into() })
            .await
            .unwrap();
        assert_eq!(
            mock.last_request().json(),
            Some(&json!({"ids": ["a", "b"], "field": "location", "value": "B"}))
        );

        api.bulk_update(
            &ids,
            &BulkUpdate::Fields { notes: None, purpose: Some("lab".into()), target_site: Some("North".into()) },
        )
        .await
        .unwrap();
        assert_eq!(
            mock.last_request().json(),
            Some(&json!({"ids": ["a", "b"], "purpose": "lab", "target_site": "North"}))
        );
    }

    #[tokio::test]
    async fn test_deletes_carry_reason() {
        let (api, mock) = mock_client();
        let ids = vec!["a".to_string()];

        api.delete_item("a", "broken").await.unwrap();
        let req = mock.last_request();
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.json(), Some(&json!({"reason": "broken"})));

        api.bulk_delete(&ids, "expired").await.unwrap();
        let req = mock.last_request();
        assert_eq!(req.path, "/items/bulk-delete");
        assert_eq!(req.json(), Some(&json!({"ids": ["a"], "reason": "expired"})));

        api.delete_all_items("reset").await.unwrap();
        assert_eq!(mock.last_request().path, "/items/delete-all");
    }

    #[tokio::test]
    async fn test_stale_items_params() {
        let (api, mock) = mock_client();
        api.stale_items(60, 2, 30).await.unwrap_or_default();
        let req = mock.last_request();
        assert_eq!(req.path, "/items/stale");
        assert_eq!(req.query.to_query_string(), "days=60&page=2&limit=30");
    }

    #[tokio::test]
    async fn test_restore_continues_past_failures() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"_id": "r1", "serial": "S1"}));
        mock.reply(500, json!({"detail": "db down"}));
        mock.reply(200, json!({"_id": "r3", "serial": "S3"}));

        let restored = api
            .restore_items(&[item("1", "S1"), item("2", "S2"), item("3", "S3")])
            .await;

        assert_eq!(restored.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["r1", "r3"]);
        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        for req in &requests {
            assert_eq!(req.query.get("is_undo"), Some("true"));
            let body = req.json().unwrap();
            assert!(body.get("_id").is_none());
            assert!(body.get("id").is_none());
            assert!(body.get("created_at").is_none());
            assert!(body.get("updated_at").is_none());
        }
    }
}
