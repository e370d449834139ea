use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient_string;

// ========================
// Item
// ========================

/// Data part of an item: what create and undo-restore send
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(default, deserialize_with = "lenient_string")]
    pub catalog_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub current_stock: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reserved_stock: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub warranty_expiry: Option<String>,
    #[serde(default, deserialize_with = "lenient_allocations")]
    pub project_allocations: BTreeMap<String, i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_site: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

fn lenient_allocations<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Object(map)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(project, qty)| {
            let qty = match qty {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }?;
            Some((project, qty))
        })
        .collect())
}

impl ItemFields {
    /// Text value of an editable text column
    pub fn text(&self, field: ItemField) -> Option<&str> {
        let value = match field {
            ItemField::CatalogNumber => &self.catalog_number,
            ItemField::Serial => &self.serial,
            ItemField::Description => &self.description,
            ItemField::Manufacturer => &self.manufacturer,
            ItemField::Location => &self.location,
            ItemField::CurrentStock => &self.current_stock,
            ItemField::ReservedStock => &self.reserved_stock,
            ItemField::WarrantyExpiry => &self.warranty_expiry,
            ItemField::Purpose => &self.purpose,
            ItemField::TargetSite => &self.target_site,
            ItemField::Notes => &self.notes,
            ItemField::ProjectAllocations => return None,
        };
        value.as_deref()
    }

    /// Set a text column; empty strings clear it
    pub fn set_text(&mut self, field: ItemField, value: &str) {
        let slot = match field {
            ItemField::CatalogNumber => &mut self.catalog_number,
            ItemField::Serial => &mut self.serial,
            ItemField::Description => &mut self.description,
            ItemField::Manufacturer => &mut self.manufacturer,
            ItemField::Location => &mut self.location,
            ItemField::CurrentStock => &mut self.current_stock,
            ItemField::ReservedStock => &mut self.reserved_stock,
            ItemField::WarrantyExpiry => &mut self.warranty_expiry,
            ItemField::Purpose => &mut self.purpose,
            ItemField::TargetSite => &mut self.target_site,
            ItemField::Notes => &mut self.notes,
            ItemField::ProjectAllocations => return,
        };
        *slot = if value.is_empty() { None } else { Some(value.to_string()) };
    }

    /// JSON value of a column, as the table formats it
    pub fn value(&self, field: ItemField) -> Value {
        match field {
            ItemField::ProjectAllocations => serde_json::to_value(&self.project_allocations)
                .unwrap_or(Value::Null),
            _ => self
                .text(field)
                .map(|s| Value::String(s.to_string()))
                .unwrap_or(Value::Null),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: ItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Wire shape; the backend sends `_id`, `id` or both
#[derive(Deserialize)]
struct RawItem {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    underscore_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(flatten)]
    fields: ItemFields,
    #[serde(default, deserialize_with = "lenient_string")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    updated_at: Option<String>,
}

impl TryFrom<RawItem> for Item {
    type Error = String;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let id = raw
            .underscore_id
            .or(raw.id)
            .ok_or_else(|| "item without _id".to_string())?;
        Ok(Item {
            id,
            fields: raw.fields,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPage {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub pages: u64,
}

// ========================
// Columns
// ========================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemField {
    CatalogNumber,
    Serial,
    Description,
    Manufacturer,
    Location,
    CurrentStock,
    ReservedStock,
    WarrantyExpiry,
    ProjectAllocations,
    TargetSite,
    Purpose,
    Notes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Tags,
    Select,
}

impl ItemField {
    /// Inventory table columns in display order
    pub const COLUMNS: [ItemField; 11] = [
        ItemField::CatalogNumber,
        ItemField::Serial,
        ItemField::Description,
        ItemField::Manufacturer,
        ItemField::Location,
        ItemField::CurrentStock,
        ItemField::WarrantyExpiry,
        ItemField::ProjectAllocations,
        ItemField::TargetSite,
        ItemField::Purpose,
        ItemField::Notes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ItemField::CatalogNumber => "catalog_number",
            ItemField::Serial => "serial",
            ItemField::Description => "description",
            ItemField::Manufacturer => "manufacturer",
            ItemField::Location => "location",
            ItemField::CurrentStock => "current_stock",
            ItemField::ReservedStock => "reserved_stock",
            ItemField::WarrantyExpiry => "warranty_expiry",
            ItemField::ProjectAllocations => "project_allocations",
            ItemField::TargetSite => "target_site",
            ItemField::Purpose => "purpose",
            ItemField::Notes => "notes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::COLUMNS
            .iter()
            .chain(std::iter::once(&ItemField::ReservedStock))
            .copied()
            .find(|f| f.key() == key)
    }

    /// Column header
    pub fn label(self) -> &'static str {
        match self {
            ItemField::CatalogNumber => "מק\"ט",
            ItemField::Serial => "סריאלי",
            ItemField::Description => "תיאור",
            ItemField::Manufacturer => "יצרן",
            ItemField::Location => "מיקום",
            ItemField::CurrentStock => "מלאי",
            ItemField::ReservedStock => "מלאי משורין",
            ItemField::WarrantyExpiry => "אחריות",
            ItemField::ProjectAllocations => "שריון עבור",
            ItemField::TargetSite => "אתר יעד",
            ItemField::Purpose => "יעוד",
            ItemField::Notes => "הערות",
        }
    }

    pub fn column_type(self) -> ColumnType {
        match self {
            ItemField::CurrentStock | ItemField::ReservedStock => ColumnType::Number,
            ItemField::WarrantyExpiry => ColumnType::Date,
            ItemField::ProjectAllocations => ColumnType::Tags,
            ItemField::TargetSite => ColumnType::Select,
            _ => ColumnType::Text,
        }
    }

    /// Sticky columns on horizontal scroll
    pub fn is_frozen(self) -> bool {
        matches!(self, ItemField::CatalogNumber | ItemField::Serial)
    }

    /// Not editable inline once the item exists
    pub fn is_immutable(self) -> bool {
        matches!(
            self,
            ItemField::Serial
                | ItemField::CatalogNumber
                | ItemField::Manufacturer
                | ItemField::ProjectAllocations
        )
    }

    /// Fields offered by the column filter row
    pub fn is_filterable(self) -> bool {
        self != ItemField::ReservedStock
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ========================
// Queries / Payloads
// ========================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Item list query. Serialized (for cache keys) as-is; converted to query
/// parameters by the items service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ItemQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Per-column filters keyed by backend field name
    pub filters: BTreeMap<String, String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub serial: Option<String>,
    pub serial_number: Option<String>,
}

impl ItemQuery {
    /// Inventory page default: newest changes first
    pub fn page(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            sort_by: Some("updated_at".to_string()),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        }
    }
}

/// Bulk update payload: one field for all, or the opt-in trio
#[derive(Clone, Debug, PartialEq)]
pub enum BulkUpdate {
    Field { field: String, value: String },
    Fields {
        notes: Option<String>,
        purpose: Option<String>,
        target_site: Option<String>,
    },
}

impl BulkUpdate {
    pub fn is_empty(&self) -> bool {
        match self {
            BulkUpdate::Field { .. } => false,
            BulkUpdate::Fields {
                notes,
                purpose,
                target_site,
            } => notes.is_none() && purpose.is_none() && target_site.is_none(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResult {
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "modified_count", alias = "updated_count")]
    pub updated: u64,
    #[serde(default, alias = "deleted_count")]
    pub deleted: u64,
}

// ========================
// Excel
// ========================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub added: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub total_processed: u64,
    #[serde(default)]
    pub errors: Vec<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectImportResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub total_groups: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportMode {
    #[default]
    All,
    Current,
}

impl ExportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportMode::All => "all",
            ExportMode::Current => "current",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportKind {
    #[default]
    Standard,
    Projects,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_accepts_either_id_key() {
        let a: Item = serde_json::from_value(json!({"_id": "1", "description": "x"})).unwrap();
        let b: Item = serde_json::from_value(json!({"id": "2"})).unwrap();
        let c: Item = serde_json::from_value(json!({"_id": "3", "id": "3"})).unwrap();
        assert_eq!(a.id, "1");
        assert_eq!(a.fields.description.as_deref(), Some("x"));
        assert_eq!(b.id, "2");
        assert_eq!(c.id, "3");
        assert!(serde_json::from_value::<Item>(json!({"description": "orphan"})).is_err());
    }

    #[test]
    fn test_loose_values_from_imports() {
        let item: Item = serde_json::from_value(json!({
            "_id": "1",
            "current_stock": 12,
            "serial": null,
            "project_allocations": {"Alpha": 3, "Beta": "2", "Bad": "x", "Half": 1.0},
            "unknown": "ignored"
        }))
        .unwrap();
        assert_eq!(item.fields.current_stock.as_deref(), Some("12"));
        assert_eq!(item.fields.serial, None);
        assert_eq!(item.fields.project_allocations.get("Alpha"), Some(&3));
        assert_eq!(item.fields.project_allocations.get("Beta"), Some(&2));
        assert_eq!(item.fields.project_allocations.get("Half"), Some(&1));
        assert!(!item.fields.project_allocations.contains_key("Bad"));
    }

    #[test]
    fn test_fields_serialize_without_identity() {
        let item: Item = serde_json::from_value(json!({
            "_id": "1", "notes": "n", "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-02T00:00:00"
        }))
        .unwrap();
        let body = serde_json::to_value(&item.fields).unwrap();
        assert!(body.get("_id").is_none());
        assert!(body.get("created_at").is_none());
        assert_eq!(body["notes"], json!("n"));
    }

    #[test]
    fn test_column_flags() {
        assert!(ItemField::Serial.is_immutable());
        assert!(ItemField::ProjectAllocations.is_immutable());
        assert!(!ItemField::Notes.is_immutable());
        assert!(ItemField::CatalogNumber.is_frozen());
        assert!(!ItemField::Manufacturer.is_frozen());
        assert_eq!(ItemField::TargetSite.column_type(), ColumnType::Select);
        assert_eq!(ItemField::from_key("reserved_stock"), Some(ItemField::ReservedStock));
        assert_eq!(ItemField::from_key("_id"), None);
    }

    #[test]
    fn test_set_text_clears_on_empty() {
        let mut fields = ItemFields::default();
        fields.set_text(ItemField::Location, "A-1");
        assert_eq!(fields.text(ItemField::Location), Some("A-1"));
        fields.set_text(ItemField::Location, "");
        assert_eq!(fields.text(ItemField::Location), None);
        assert_eq!(fields.value(ItemField::Location), Value::Null);
    }
}
