//! Cell selection state
//!
//! Plain data, no signals. The Leptos bindings in `lib.rs` wrap it in a
//! signal and feed it mouse events.

/// A cell addressed by row id and column field
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row_id: String,
    pub field: String,
}

impl CellRef {
    pub fn new(row_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            field: field.into(),
        }
    }

    /// Stable key, `"{row_id}-{field}"`
    pub fn key(&self) -> String {
        format!("{}-{}", self.row_id, self.field)
    }
}

/// A selected cell together with its display value at selection time
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedCell {
    pub cell: CellRef,
    pub value: String,
}

/// Multi-cell selection with ctrl-drag support
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    cells: Vec<SelectedCell>,
    dragging: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary-button press on a cell.
    ///
    /// With `additive` (ctrl/meta held) the cell's membership is toggled and a
    /// drag starts. Otherwise the cell becomes the only selection, or the
    /// selection is cleared if it already was the only selected cell.
    pub fn mouse_down(&mut self, cell: CellRef, value: String, additive: bool) {
        if additive {
            self.dragging = true;
            if let Some(pos) = self.position(&cell) {
                self.cells.remove(pos);
            } else {
                self.cells.push(SelectedCell { cell, value });
            }
            return;
        }

        let only_this = self.cells.len() == 1 && self.cells[0].cell == cell;
        self.cells.clear();
        if !only_this {
            self.cells.push(SelectedCell { cell, value });
        }
    }

    /// Pointer entered a cell; extends the selection while ctrl-dragging
    pub fn mouse_enter(&mut self, cell: CellRef, value: String, additive: bool) {
        if self.dragging && additive {
            self.add(cell, value);
        }
    }

    pub fn mouse_up(&mut self) {
        self.dragging = false;
    }

    /// Add a cell unless it is already selected
    pub fn add(&mut self, cell: CellRef, value: String) {
        if self.position(&cell).is_none() {
            self.cells.push(SelectedCell { cell, value });
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Keyboard move onto `cell`. Ctrl-moves add it; plain moves drop the
    /// multi-selection.
    pub fn moved_to(&mut self, cell: CellRef, value: String, extend: bool) {
        if extend {
            self.add(cell, value);
        } else {
            self.clear();
        }
    }

    pub fn is_selected(&self, cell: &CellRef) -> bool {
        self.position(cell).is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn cells(&self) -> &[SelectedCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Selected values in selection order, tab separated
    pub fn copy_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.value.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }

    fn position(&self, cell: &CellRef) -> Option<usize> {
        self.cells.iter().position(|c| &c.cell == cell)
    }
}

/// Focusing the already focused cell removes focus
pub fn toggle_focus(current: Option<&CellRef>, cell: CellRef) -> Option<CellRef> {
    match current {
        Some(existing) if *existing == cell => None,
        _ => Some(cell),
    }
}
