//! Procurement Endpoints

use super::client::{ApiClient, QueryParams, Transport, UploadPart};
use super::endpoints;
use super::error::ApiError;
use crate::models::{
    FileUploadResponse, MessageResponse, ProcurementDraft, ProcurementOrder, ProcurementPage,
    ProcurementQuery, ProcurementStatus, ProcurementTab, ReasonBody,
};

fn order_params(query: &ProcurementQuery) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push("page", query.page.max(1))
        .push("page_size", query.page_size.clamp(1, 100))
        .push_non_empty("catalog_number", query.catalog_number.as_deref())
        .push_non_empty("manufacturer", query.manufacturer.as_deref());
    match query.tab {
        ProcurementTab::InProcess => params.push("status_ne", ProcurementStatus::Received.as_str()),
        ProcurementTab::Completed => params.push("status_in", ProcurementStatus::Received.as_str()),
    };
    params
}

impl<T: Transport> ApiClient<T> {
    pub async fn list_orders(&self, query: &ProcurementQuery) -> Result<ProcurementPage, ApiError> {
        self.get(endpoints::PROCUREMENT_ORDERS, order_params(query))
            .await
    }

    pub async fn create_order(&self, draft: &ProcurementDraft) -> Result<ProcurementOrder, ApiError> {
        self.post(endpoints::PROCUREMENT_ORDERS, QueryParams::new(), draft)
            .await
    }

    pub async fn update_order(&self, id: &str, draft: &ProcurementDraft) -> Result<ProcurementOrder, ApiError> {
        self.put(&endpoints::procurement_order_by_id(id), draft).await
    }

    pub async fn delete_order(&self, id: &str, reason: &str) -> Result<MessageResponse, ApiError> {
        self.delete(&endpoints::procurement_order_by_id(id), Some(&ReasonBody { reason }))
            .await
    }

    pub async fn upload_order_file(&self, order_id: &str, part: UploadPart) -> Result<FileUploadResponse, ApiError> {
        self.upload(&endpoints::procurement_files(order_id), part)
            .await
    }

    pub async fn download_order_file(&self, order_id: &str, file_id: &str) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(
            &endpoints::procurement_file_by_id(order_id, file_id),
            QueryParams::new(),
        )
        .await
    }

    pub async fn delete_order_file(&self, order_id: &str, file_id: &str) -> Result<MessageResponse, ApiError> {
        self.delete::<(), _>(&endpoints::procurement_file_by_id(order_id, file_id), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::Method;
    use crate::api::mock::mock_client;
    use serde_json::json;

    #[test]
    fn test_tabs_map_to_status_filters() {
        let mut query = ProcurementQuery { page: 1, page_size: 20, ..Default::default() };
        let params = order_params(&query);
        assert_eq!(params.get("status_ne"), Some("received"));
        assert!(!params.contains("status_in"));

        query.tab = ProcurementTab::Completed;
        query.manufacturer = Some("ACME".into());
        let params = order_params(&query);
        assert_eq!(params.get_all("status_in"), vec!["received"]);
        assert!(!params.contains("status_ne"));
        assert_eq!(params.get("manufacturer"), Some("ACME"));
    }

    #[test]
    fn test_page_size_is_clamped() {
        let query = ProcurementQuery { page: 0, page_size: 500, ..Default::default() };
        let params = order_params(&query);
        assert_eq!(params.get("page"), Some("1"));
        assert_eq!(params.get("page_size"), Some("100"));
    }

    #[tokio::test]
    async fn test_order_requests() {
        let (api, mock) = mock_client();
        let order = json!({
            "id": "o1", "catalog_number": "C", "manufacturer": "M", "quantity": 1,
            "order_date": "2024-05-01T00:00:00", "amount": 0.0, "status": "waiting_emf",
            "files": [], "created_by": "dana"
        });
        mock.reply(200, order.clone());
        mock.reply(200, order);

        let draft = ProcurementDraft {
            catalog_number: "C".into(),
            manufacturer: "M".into(),
            quantity: 1,
            order_date: "2024-05-01".into(),
            ..Default::default()
        };
        api.create_order(&draft).await.unwrap();
        assert_eq!(mock.last_request().json().unwrap()["status"], json!("waiting_emf"));

        api.update_order("o1", &draft).await.unwrap();
        let req = mock.last_request();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.path, "/procurement/orders/o1");

        api.delete_order("o1", "duplicate").await.unwrap_or_default();
        assert_eq!(mock.last_request().json(), Some(&json!({"reason": "duplicate"})));
    }

    #[tokio::test]
    async fn test_file_requests() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"file_id": "f1", "filename": "emf.pdf", "message": "ok"}));
        let part = UploadPart {
            field: "file".into(),
            filename: "emf.pdf".into(),
            mime: "application/pdf".into(),
            bytes: vec![0x25],
        };
        let uploaded = api.upload_order_file("o1", part).await.unwrap();
        assert_eq!(uploaded.file_id, "f1");
        assert_eq!(mock.last_request().path, "/procurement/orders/o1/files");

        mock.reply_raw(200, vec![1, 2]);
        assert_eq!(api.download_order_file("o1", "f1").await.unwrap(), vec![1, 2]);

        api.delete_order_file("o1", "f1").await.unwrap_or_default();
        let req = mock.last_request();
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.path, "/procurement/orders/o1/files/f1");
        assert!(req.json().is_none());
    }
}
