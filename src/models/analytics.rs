use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One bar/slice of a distribution chart
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub projects: Vec<NamedValue>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub active_allocations: u64,
    #[serde(default)]
    pub serial_equipment: u64,
    #[serde(default)]
    pub non_serial_equipment: u64,
    #[serde(default)]
    pub target_sites: Vec<NamedValue>,
    #[serde(default)]
    pub manufacturers: Vec<NamedValue>,
    #[serde(default)]
    pub locations: Vec<NamedValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub days: u32,
}

impl ActivityStats {
    pub fn total(&self) -> u64 {
        self.created + self.updated + self.deleted
    }
}

/// A day on the activity timeline: the date plus a count per series
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, f64>,
}

/// Largest value in a series, for scaling bar widths
pub fn series_max(series: &[NamedValue]) -> f64 {
    series.iter().map(|v| v.value).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dashboard_with_missing_series() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "projects": [{"name": "Alpha", "value": 4}],
            "total_items": 120
        }))
        .unwrap();
        assert_eq!(stats.total_items, 120);
        assert_eq!(series_max(&stats.projects), 4.0);
        assert!(stats.locations.is_empty());
    }

    #[test]
    fn test_timeline_point_collects_series() {
        let point: TimelinePoint =
            serde_json::from_value(json!({"date": "2024-05-01", "created": 2, "deleted": 1})).unwrap();
        assert_eq!(point.counts.get("created"), Some(&2.0));
        assert_eq!(point.counts.len(), 2);
    }
}
