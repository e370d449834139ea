//! Undo / Redo History
//!
//! Two bounded histories: cell edits and deletes. `undo` takes whichever
//! was recorded last and hands back the operation the caller must send to
//! the backend. Deletes cannot be redone.

use leptos::prelude::*;
use serde_json::{json, Value};

use crate::cache::{Clock, SystemClock};
use crate::models::Item;

#[derive(Clone, Debug, PartialEq)]
pub struct EditAction {
    pub item_id: String,
    pub field: String,
    pub new_value: String,
    pub previous_value: String,
    pub timestamp: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteAction {
    pub items: Vec<Item>,
    pub is_bulk: bool,
    pub timestamp: u64,
}

/// What the caller has to send to apply an undo or redo
#[derive(Clone, Debug, PartialEq)]
pub enum UndoOp {
    /// Write `value` into `field`; `is_undo` marks it for the audit log
    WriteField {
        item_id: String,
        field: String,
        value: String,
        is_undo: bool,
    },
    /// Re-create deleted items
    RestoreItems(Vec<Item>),
}

/// The history entry an undo consumed
#[derive(Clone, Debug, PartialEq)]
pub enum Undone {
    Edit(EditAction),
    Delete(DeleteAction),
}

impl Undone {
    /// `changes` payload for the undo audit entry
    pub fn audit_changes(&self) -> Value {
        match self {
            Undone::Edit(edit) => json!({
                "type": "edit",
                "field": edit.field,
                "from": edit.new_value,
                "to": edit.previous_value,
            }),
            Undone::Delete(delete) => json!({
                "type": "delete",
                "count": delete.items.len(),
                "is_bulk": delete.is_bulk,
            }),
        }
    }

    pub fn resource_id(&self) -> Option<String> {
        match self {
            Undone::Edit(edit) => Some(edit.item_id.clone()),
            Undone::Delete(delete) if delete.items.len() == 1 => {
                delete.items.first().map(|i| i.id.clone())
            }
            Undone::Delete(_) => None,
        }
    }
}

pub struct UndoHistory<C: Clock = SystemClock> {
    edits: Vec<EditAction>,
    edit_redo: Vec<EditAction>,
    deletes: Vec<DeleteAction>,
    delete_redo: Vec<DeleteAction>,
    max_edits: usize,
    max_deletes: usize,
    clock: C,
}

impl UndoHistory<SystemClock> {
    pub fn new(max_edits: usize, max_deletes: usize) -> Self {
        Self::with_clock(max_edits, max_deletes, SystemClock)
    }
}

fn push_capped<T>(stack: &mut Vec<T>, value: T, cap: usize) {
    stack.push(value);
    if stack.len() > cap {
        let excess = stack.len() - cap;
        stack.drain(..excess);
    }
}

impl<C: Clock> UndoHistory<C> {
    pub fn with_clock(max_edits: usize, max_deletes: usize, clock: C) -> Self {
        Self {
            edits: Vec::new(),
            edit_redo: Vec::new(),
            deletes: Vec::new(),
            delete_redo: Vec::new(),
            max_edits,
            max_deletes,
            clock,
        }
    }

    /// Record an edit that is about to be sent. Clears the redo stack.
    pub fn record_edit(&mut self, item_id: &str, field: &str, new_value: &str, previous_value: &str) {
        let action = EditAction {
            item_id: item_id.to_string(),
            field: field.to_string(),
            new_value: new_value.to_string(),
            previous_value: previous_value.to_string(),
            timestamp: self.clock.now_ms(),
        };
        push_capped(&mut self.edits, action, self.max_edits);
        self.edit_redo.clear();
    }

    /// Record items before they are deleted
    pub fn record_delete(&mut self, items: Vec<Item>, is_bulk: bool) {
        let action = DeleteAction {
            items,
            is_bulk,
            timestamp: self.clock.now_ms(),
        };
        push_capped(&mut self.deletes, action, self.max_deletes);
        self.delete_redo.clear();
    }

    /// Pop the most recent action. Ties between an edit and a delete go to
    /// the edit.
    pub fn undo(&mut self) -> Option<(UndoOp, Undone)> {
        let last_edit = self.edits.last().map(|a| a.timestamp);
        let last_delete = self.deletes.last().map(|a| a.timestamp);
        let take_edit = match (last_edit, last_delete) {
            (Some(e), Some(d)) => e >= d,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return None,
        };

        if take_edit {
            let edit = self.edits.pop()?;
            self.edit_redo.push(edit.clone());
            let op = UndoOp::WriteField {
                item_id: edit.item_id.clone(),
                field: edit.field.clone(),
                value: edit.previous_value.clone(),
                is_undo: true,
            };
            Some((op, Undone::Edit(edit)))
        } else {
            let delete = self.deletes.pop()?;
            self.delete_redo.push(delete.clone());
            Some((UndoOp::RestoreItems(delete.items.clone()), Undone::Delete(delete)))
        }
    }

    /// Replay the last undone edit
    pub fn redo(&mut self) -> Option<UndoOp> {
        let edit = self.edit_redo.pop()?;
        let op = UndoOp::WriteField {
            item_id: edit.item_id.clone(),
            field: edit.field.clone(),
            value: edit.new_value.clone(),
            is_undo: false,
        };
        self.edits.push(edit);
        Some(op)
    }

    pub fn can_undo(&self) -> bool {
        !self.edits.is_empty() || !self.deletes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.edit_redo.is_empty()
    }

    pub fn edit_history_len(&self) -> usize {
        self.edits.len()
    }

    pub fn delete_history_len(&self) -> usize {
        self.deletes.len()
    }
}

// ========================
// Shared handle
// ========================

/// Page-owned history handed to the grid. `can_undo`/`can_redo` subscribe
/// to every change made through [`SharedHistory::update`].
#[derive(Clone, Copy)]
pub struct SharedHistory {
    history: StoredValue<UndoHistory>,
    version: RwSignal<u64>,
}

impl SharedHistory {
    pub fn new(max_edits: usize, max_deletes: usize) -> Self {
        Self {
            history: StoredValue::new(UndoHistory::new(max_edits, max_deletes)),
            version: RwSignal::new(0),
        }
    }

    /// `None` once the owning page is gone
    pub fn update<R>(&self, f: impl FnOnce(&mut UndoHistory) -> R) -> Option<R> {
        let out = self.history.try_update_value(f)?;
        self.version.try_update(|v| *v += 1);
        Some(out)
    }

    pub fn can_undo(&self) -> bool {
        self.version.track();
        self.history.try_with_value(UndoHistory::can_undo).unwrap_or(false)
    }

    pub fn can_redo(&self) -> bool {
        self.version.track();
        self.history.try_with_value(UndoHistory::can_redo).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct StepClock(Rc<Cell<u64>>);

    impl StepClock {
        fn set(&self, ms: u64) {
            self.0.set(ms);
        }
    }

    impl Clock for StepClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    fn item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn history() -> (UndoHistory<StepClock>, StepClock) {
        let clock = StepClock::default();
        (UndoHistory::with_clock(3, 2, clock.clone()), clock)
    }

    #[test]
    fn test_undo_edit_then_redo() {
        let (mut h, _) = history();
        h.record_edit("i1", "location", "B2", "A1");

        let (op, undone) = h.undo().unwrap();
        assert_eq!(
            op,
            UndoOp::WriteField {
                item_id: "i1".into(),
                field: "location".into(),
                value: "A1".into(),
                is_undo: true
            }
        );
        assert_eq!(
            undone.audit_changes(),
            json!({"type": "edit", "field": "location", "from": "B2", "to": "A1"})
        );
        assert!(h.can_redo());

        match h.redo() {
            Some(UndoOp::WriteField { value, is_undo, .. }) => {
                assert_eq!(value, "B2");
                assert!(!is_undo);
            }
            other => panic!("unexpected redo: {:?}", other),
        }
        assert_eq!(h.edit_history_len(), 1);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let (mut h, _) = history();
        h.record_edit("i1", "notes", "b", "a");
        h.undo();
        h.record_edit("i1", "notes", "c", "a");
        assert!(!h.can_redo());
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_histories_are_capped() {
        let (mut h, clock) = history();
        for i in 0..5u64 {
            clock.set(i);
            h.record_edit(&format!("i{}", i), "notes", "x", "");
            h.record_delete(vec![item(&format!("d{}", i))], false);
        }
        assert_eq!(h.edit_history_len(), 3);
        assert_eq!(h.delete_history_len(), 2);
    }

    #[test]
    fn test_undo_picks_most_recent_and_ties_go_to_edits() {
        let (mut h, clock) = history();
        clock.set(10);
        h.record_edit("i1", "notes", "b", "a");
        clock.set(20);
        h.record_delete(vec![item("x"), item("y")], true);

        let (op, undone) = h.undo().unwrap();
        assert_eq!(op, UndoOp::RestoreItems(vec![item("x"), item("y")]));
        assert_eq!(
            undone.audit_changes(),
            json!({"type": "delete", "count": 2, "is_bulk": true})
        );
        assert_eq!(undone.resource_id(), None);

        clock.set(30);
        h.record_delete(vec![item("z")], false);
        clock.set(30);
        h.record_edit("i2", "notes", "d", "c");
        let (_, undone) = h.undo().unwrap();
        assert!(matches!(undone, Undone::Edit(ref e) if e.item_id == "i2"));
    }

    #[test]
    fn test_delete_redo_is_unsupported() {
        let (mut h, _) = history();
        h.record_delete(vec![item("x")], false);
        let (_, undone) = h.undo().unwrap();
        assert_eq!(undone.resource_id(), Some("x".to_string()));
        assert!(!h.can_redo());
        assert!(h.redo().is_none());
        assert!(h.undo().is_none());
    }

    #[test]
    fn test_shared_history_reports_availability() {
        let shared = SharedHistory::new(3, 2);
        assert!(!shared.can_undo());
        assert!(!shared.can_redo());

        shared.update(|h| h.record_edit("1", "notes", "new", "old"));
        assert!(shared.can_undo());
        assert!(!shared.can_redo());

        let undone = shared.update(UndoHistory::undo).flatten();
        assert!(matches!(undone, Some((UndoOp::WriteField { .. }, _))));
        assert!(!shared.can_undo());
        assert!(shared.can_redo());
    }
}
