//! Analytics Endpoints

use super::client::{ApiClient, QueryParams, Transport};
use super::endpoints;
use super::error::ApiError;
use crate::models::{ActivityStats, DashboardStats, NamedValue, TimelinePoint};

impl<T: Transport> ApiClient<T> {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get(endpoints::ANALYTICS, QueryParams::new()).await
    }

    /// Project allocation totals for a catalog number
    pub async fn item_project_stats(&self, catalog_number: &str) -> Result<Vec<NamedValue>, ApiError> {
        self.get(&endpoints::analytics_item(catalog_number), QueryParams::new())
            .await
    }

    pub async fn activity_stats(&self, days: u32) -> Result<ActivityStats, ApiError> {
        let mut params = QueryParams::new();
        params.push("days", days);
        self.get(endpoints::ANALYTICS_ACTIVITY, params).await
    }

    pub async fn activity_timeline(
        &self,
        days: u32,
        catalog_number: Option<&str>,
    ) -> Result<Vec<TimelinePoint>, ApiError> {
        let mut params = QueryParams::new();
        params
            .push("days", days)
            .push_non_empty("catalog_number", catalog_number);
        self.get(endpoints::ANALYTICS_TIMELINE, params).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::mock::mock_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_analytics_requests() {
        let (api, mock) = mock_client();
        mock.reply(200, json!({"created": 3, "updated": 5, "deleted": 1, "days": 7}));
        let activity = api.activity_stats(7).await.unwrap();
        assert_eq!(activity.total(), 9);
        assert_eq!(mock.last_request().query.get("days"), Some("7"));

        mock.reply(200, json!([{"name": "Alpha", "value": 3}]));
        let stats = api.item_project_stats("AB/1").await.unwrap();
        assert_eq!(stats[0].name, "Alpha");
        assert_eq!(mock.last_request().path, "/analytics/item/AB%2F1");

        mock.reply(200, json!([]));
        api.activity_timeline(30, None).await.unwrap();
        assert!(!mock.last_request().query.contains("catalog_number"));

        mock.reply(200, json!([]));
        api.activity_timeline(30, Some("C-7")).await.unwrap();
        assert_eq!(mock.last_request().query.get("catalog_number"), Some("C-7"));
    }
}
