use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementStatus {
    #[default]
    WaitingEmf,
    WaitingBom,
    Ordered,
    Received,
}

impl ProcurementStatus {
    pub const ALL: [ProcurementStatus; 4] = [
        ProcurementStatus::WaitingEmf,
        ProcurementStatus::WaitingBom,
        ProcurementStatus::Ordered,
        ProcurementStatus::Received,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcurementStatus::WaitingEmf => "waiting_emf",
            ProcurementStatus::WaitingBom => "waiting_bom",
            ProcurementStatus::Ordered => "ordered",
            ProcurementStatus::Received => "received",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcurementStatus::WaitingEmf => "מחכה ל-EMF",
            ProcurementStatus::WaitingBom => "מחכה ל-BOM",
            ProcurementStatus::Ordered => "רכש יצא",
            ProcurementStatus::Received => "רכש הגיע",
        }
    }

    /// Next step in the workflow, `None` once received
    pub fn next(self) -> Option<Self> {
        match self {
            ProcurementStatus::WaitingEmf => Some(ProcurementStatus::WaitingBom),
            ProcurementStatus::WaitingBom => Some(ProcurementStatus::Ordered),
            ProcurementStatus::Ordered => Some(ProcurementStatus::Received),
            ProcurementStatus::Received => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcurementFile {
    pub file_id: String,
    pub filename: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcurementOrder {
    #[serde(alias = "_id")]
    pub id: String,
    pub catalog_number: String,
    pub manufacturer: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    pub order_date: String,
    pub amount: f64,
    #[serde(default)]
    pub status: ProcurementStatus,
    #[serde(default)]
    pub received_emf: bool,
    #[serde(default)]
    pub received_bom: bool,
    #[serde(default)]
    pub files: Vec<ProcurementFile>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ProcurementOrder {
    /// Editable part, for pre-filling the edit form
    pub fn draft(&self) -> ProcurementDraft {
        ProcurementDraft {
            catalog_number: self.catalog_number.clone(),
            manufacturer: self.manufacturer.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            order_date: self.order_date.chars().take(10).collect(),
            amount: self.amount,
            status: self.status,
            received_emf: self.received_emf,
            received_bom: self.received_bom,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcurementPage {
    #[serde(default)]
    pub orders: Vec<ProcurementOrder>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
}

/// Create/update body
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProcurementDraft {
    pub catalog_number: String,
    pub manufacturer: String,
    pub description: String,
    pub quantity: u32,
    /// `YYYY-MM-DD`; the backend parses it as a datetime
    pub order_date: String,
    pub amount: f64,
    pub status: ProcurementStatus,
    pub received_emf: bool,
    pub received_bom: bool,
}

impl ProcurementDraft {
    /// Field-level problems, empty when the draft can be sent
    pub fn problems(&self) -> Vec<(&'static str, &'static str)> {
        let mut out = Vec::new();
        if self.catalog_number.trim().is_empty() {
            out.push(("catalog_number", "שדה חובה"));
        }
        if self.manufacturer.trim().is_empty() {
            out.push(("manufacturer", "שדה חובה"));
        }
        if self.quantity == 0 {
            out.push(("quantity", "הכמות חייבת להיות גדולה מ-0"));
        }
        if !(self.amount >= 0.0) {
            out.push(("amount", "הסכום לא יכול להיות שלילי"));
        }
        if self.order_date.trim().is_empty() {
            out.push(("order_date", "שדה חובה"));
        }
        out
    }
}

/// Which tab of the procurement page is listed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ProcurementTab {
    /// Everything not yet received
    #[default]
    InProcess,
    Completed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ProcurementQuery {
    pub page: u64,
    pub page_size: u64,
    pub catalog_number: Option<String>,
    pub manufacturer: Option<String>,
    pub tab: ProcurementTab,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub file_id: String,
    pub filename: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_workflow() {
        assert_eq!(ProcurementStatus::WaitingEmf.next(), Some(ProcurementStatus::WaitingBom));
        assert_eq!(ProcurementStatus::Received.next(), None);
        assert_eq!(
            serde_json::to_value(ProcurementStatus::WaitingBom).unwrap(),
            json!("waiting_bom")
        );
    }

    #[test]
    fn test_draft_problems() {
        let draft = ProcurementDraft {
            catalog_number: "C-1".into(),
            manufacturer: "ACME".into(),
            quantity: 0,
            amount: -1.0,
            order_date: "2024-05-01".into(),
            ..Default::default()
        };
        let fields: Vec<_> = draft.problems().into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["quantity", "amount"]);
    }

    #[test]
    fn test_order_draft_trims_date() {
        let order: ProcurementOrder = serde_json::from_value(json!({
            "id": "o1", "catalog_number": "C", "manufacturer": "M", "quantity": 2,
            "order_date": "2024-05-01T00:00:00", "amount": 10.5, "status": "ordered"
        }))
        .unwrap();
        let draft = order.draft();
        assert_eq!(draft.order_date, "2024-05-01");
        assert_eq!(draft.status, ProcurementStatus::Ordered);
    }
}
