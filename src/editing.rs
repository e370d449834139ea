//! Inline Cell Editing
//!
//! One cell at a time. Saving yields an edit only when the trimmed value
//! actually changed.

use crate::models::ItemField;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditingCell {
    pub item_id: String,
    pub field: ItemField,
    pub original: String,
}

/// A change to send to the backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellEdit {
    pub item_id: String,
    pub field: ItemField,
    pub new_value: String,
    pub previous_value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellEditor {
    cell: Option<EditingCell>,
    value: String,
}

impl CellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for immutable columns
    pub fn start(&mut self, item_id: &str, field: ItemField, current: Option<&str>) -> bool {
        if field.is_immutable() {
            return false;
        }
        let original = current.unwrap_or_default().to_string();
        self.value = original.clone();
        self.cell = Some(EditingCell {
            item_id: item_id.to_string(),
            field,
            original,
        });
        true
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cell(&self) -> Option<&EditingCell> {
        self.cell.as_ref()
    }

    pub fn is_editing(&self, item_id: &str, field: ItemField) -> bool {
        self.cell
            .as_ref()
            .is_some_and(|c| c.item_id == item_id && c.field == field)
    }

    pub fn is_active(&self) -> bool {
        self.cell.is_some()
    }

    /// Leave editing mode; the edit is returned only if something changed
    pub fn save(&mut self) -> Option<CellEdit> {
        let cell = self.cell.take()?;
        let new_value = std::mem::take(&mut self.value);
        if new_value.trim() == cell.original.trim() {
            return None;
        }
        Some(CellEdit {
            item_id: cell.item_id,
            field: cell.field,
            new_value,
            previous_value: cell.original,
        })
    }

    pub fn cancel(&mut self) {
        self.cell = None;
        self.value.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immutable_fields_are_refused() {
        let mut editor = CellEditor::new();
        assert!(!editor.start("i1", ItemField::Serial, Some("SN-1")));
        assert!(!editor.is_active());
        assert!(editor.start("i1", ItemField::Location, Some("A1")));
        assert!(editor.is_editing("i1", ItemField::Location));
        assert_eq!(editor.value(), "A1");
    }

    #[test]
    fn test_save_ignores_whitespace_only_changes() {
        let mut editor = CellEditor::new();
        editor.start("i1", ItemField::Notes, Some("hello"));
        editor.set_value("  hello ");
        assert_eq!(editor.save(), None);
        assert!(!editor.is_active());
    }

    #[test]
    fn test_save_returns_edit() {
        let mut editor = CellEditor::new();
        editor.start("i1", ItemField::Notes, None);
        editor.set_value("new");
        assert_eq!(
            editor.save(),
            Some(CellEdit {
                item_id: "i1".into(),
                field: ItemField::Notes,
                new_value: "new".into(),
                previous_value: String::new(),
            })
        );
    }

    #[test]
    fn test_cancel_clears_state() {
        let mut editor = CellEditor::new();
        editor.start("i1", ItemField::Purpose, Some("x"));
        editor.cancel();
        assert_eq!(editor, CellEditor::new());
        assert_eq!(editor.save(), None);
    }
}
