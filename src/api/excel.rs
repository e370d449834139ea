//! Excel Import / Export

use chrono::NaiveDate;

use super::client::{ApiClient, Transport, UploadPart};
use super::endpoints;
use super::error::ApiError;
use super::items::item_query_params;
use crate::models::{ExportMode, ImportKind, ImportResult, ItemQuery, ProjectImportResult};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `inventory_export_YYYY-MM-DD.xlsx`
pub fn export_filename(date: NaiveDate) -> String {
    format!("inventory_export_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Result of either import flavour, for the import summary toast
#[derive(Clone, Debug, PartialEq)]
pub enum ImportOutcome {
    Items(ImportResult),
    Projects(ProjectImportResult),
}

impl ImportOutcome {
    pub fn summary(&self) -> String {
        match self {
            ImportOutcome::Items(r) => format!(
                "נוספו: {}, עודכנו: {}, דולגו: {}",
                r.added, r.updated, r.skipped
            ),
            ImportOutcome::Projects(r) => format!("עודכנו {} פריטים", r.updated),
        }
    }
}

fn file_part(filename: &str, bytes: Vec<u8>) -> UploadPart {
    UploadPart {
        field: "file".to_string(),
        filename: filename.to_string(),
        mime: XLSX_MIME.to_string(),
        bytes,
    }
}

impl<T: Transport> ApiClient<T> {
    pub async fn import_excel(&self, filename: &str, bytes: Vec<u8>) -> Result<ImportResult, ApiError> {
        self.upload(endpoints::IMPORT_EXCEL, file_part(filename, bytes))
            .await
    }

    /// Project allocation sheet
    pub async fn import_projects(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ProjectImportResult, ApiError> {
        self.upload(endpoints::IMPORT_PROJECTS, file_part(filename, bytes))
            .await
    }

    pub async fn import_file(
        &self,
        kind: ImportKind,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportOutcome, ApiError> {
        match kind {
            ImportKind::Standard => self
                .import_excel(filename, bytes)
                .await
                .map(ImportOutcome::Items),
            ImportKind::Projects => self
                .import_projects(filename, bytes)
                .await
                .map(ImportOutcome::Projects),
        }
    }

    /// Spreadsheet bytes for the current filters
    pub async fn export_excel(&self, query: &ItemQuery, mode: ExportMode) -> Result<Vec<u8>, ApiError> {
        let mut params = item_query_params(query);
        params.push("export_mode", mode.as_str());
        self.get_bytes(endpoints::EXPORT_EXCEL, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{Method, RequestBody};
    use crate::api::mock::mock_client;
    use serde_json::json;

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_filename(date), "inventory_export_2024-03-07.xlsx");
    }

    #[tokio::test]
    async fn test_import_sends_multipart_file() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({
            "message": "ok", "added": 3, "updated": 1, "skipped": 0, "total_processed": 4, "errors": []
        }));

        let result = api.import_excel("stock.xlsx", vec![1, 2, 3]).await.unwrap();
        assert_eq!(result.added, 3);

        let req = mock.last_request();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/items/import-excel");
        match req.body {
            RequestBody::Multipart(part) => {
                assert_eq!(part.field, "file");
                assert_eq!(part.filename, "stock.xlsx");
                assert_eq!(part.bytes, vec![1, 2, 3]);
            }
            other => panic!("expected multipart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_project_import_outcome() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"message": "done", "updated": 7, "total_groups": 3}));

        let outcome = api
            .import_file(ImportKind::Projects, "p.xlsx", Vec::new())
            .await
            .unwrap();
        assert_eq!(mock.last_request().path, "/items/import-projects");
        assert_eq!(outcome.summary(), "עודכנו 7 פריטים");
    }

    #[tokio::test]
    async fn test_export_adds_mode_and_filters() {
        let (api, mock) = mock_client();
        mock.reply_raw(200, b"PK\x03\x04".to_vec());

        let mut query = ItemQuery::page(3, 50);
        query.search = Some("cable".into());
        let bytes = api.export_excel(&query, ExportMode::Current).await.unwrap();

        assert_eq!(bytes, b"PK\x03\x04".to_vec());
        let req = mock.last_request();
        assert_eq!(req.path, "/items/export-excel");
        assert_eq!(req.query.get("export_mode"), Some("current"));
        assert_eq!(req.query.get("search"), Some("cable"));
        assert_eq!(req.query.get("page"), Some("3"));
    }
}
