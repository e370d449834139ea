//! Keyboard navigation
//!
//! Cursor movement over a rows x columns grid and the key map that turns
//! keyboard input into grid commands. Layout is right-to-left: the left
//! arrow moves to the next column.

use crate::selection::CellRef;

/// What happens when a horizontal move runs past the last/first column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overflow {
    /// Stay on the edge column
    Clamp,
    /// Continue on the next/previous row
    Wrap,
}

/// Compute the next focused cell.
///
/// With nothing focused the first cell is returned. A focused cell whose row
/// or column is no longer present is treated as sitting just before the
/// first row/column, and the result is clamped into range.
pub fn move_focus<R, C>(
    focused: Option<&CellRef>,
    rows: &[R],
    columns: &[C],
    row_delta: i32,
    col_delta: i32,
    overflow: Overflow,
) -> Option<CellRef>
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    if rows.is_empty() || columns.is_empty() {
        return None;
    }

    let Some(current) = focused else {
        return Some(CellRef::new(rows[0].as_ref(), columns[0].as_ref()));
    };

    let row_idx = index_of(rows, &current.row_id);
    let col_idx = index_of(columns, &current.field);
    let last_row = rows.len() as i64 - 1;
    let last_col = columns.len() as i64 - 1;

    let mut row = row_idx + row_delta as i64;
    let mut col = col_idx + col_delta as i64;

    if overflow == Overflow::Wrap {
        if col > last_col {
            col = 0;
            row += 1;
        } else if col < 0 {
            col = last_col;
            row -= 1;
        }
    }

    let row = row.clamp(0, last_row) as usize;
    let col = col.clamp(0, last_col) as usize;
    Some(CellRef::new(rows[row].as_ref(), columns[col].as_ref()))
}

fn index_of<T: AsRef<str>>(list: &[T], needle: &str) -> i64 {
    list.iter()
        .position(|v| v.as_ref() == needle)
        .map(|i| i as i64)
        .unwrap_or(-1)
}

/// Keyboard input relevant to the grid
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyInput {
    pub key: String,
    /// Ctrl or Meta
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Focus is in an input that is not the grid's cell editor (search box, filters)
    pub in_foreign_input: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Grid action decoded from a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridCommand {
    /// Not handled; the browser default applies
    None,
    /// Handled with no effect (default suppressed)
    Swallow,
    Save,
    Cancel,
    SaveAndMove { rows: i32, cols: i32 },
    Copy,
    Undo,
    Redo,
    Move { rows: i32, cols: i32, extend: bool },
    StartEdit,
    ClearSelection,
}

impl GridCommand {
    /// Whether the browser default action should be prevented
    pub fn prevents_default(&self) -> bool {
        !matches!(self, GridCommand::None | GridCommand::ClearSelection)
    }
}

/// Map a key press to a grid command.
///
/// While editing only save/cancel/commit keys are intercepted so the input
/// keeps native text undo, copy and paste.
pub fn command_for(input: &KeyInput, editing: bool, has_selection: bool) -> GridCommand {
    let key = input.key.as_str();

    if input.ctrl && key.eq_ignore_ascii_case("s") {
        return if editing { GridCommand::Save } else { GridCommand::Swallow };
    }

    if editing {
        return match key {
            "Escape" => GridCommand::Cancel,
            "Enter" => GridCommand::SaveAndMove { rows: 1, cols: 0 },
            "Tab" => GridCommand::SaveAndMove {
                rows: 0,
                cols: if input.shift { -1 } else { 1 },
            },
            _ => GridCommand::None,
        };
    }

    if input.ctrl {
        return match key {
            "c" | "C" if has_selection => GridCommand::Copy,
            "z" | "Z" if !input.shift => GridCommand::Undo,
            "y" | "Y" => GridCommand::Redo,
            "z" | "Z" => GridCommand::Redo,
            "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => arrow(key, true),
            _ => GridCommand::None,
        };
    }

    if input.in_foreign_input {
        return GridCommand::None;
    }

    match key {
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => arrow(key, false),
        "Tab" => GridCommand::Move {
            rows: 0,
            cols: if input.shift { -1 } else { 1 },
            extend: false,
        },
        "Enter" | "F2" => GridCommand::StartEdit,
        "Escape" if has_selection => GridCommand::ClearSelection,
        k if k.chars().count() == 1 && !input.alt => GridCommand::StartEdit,
        _ => GridCommand::None,
    }
}

/// [`command_for`] for a window-level listener.
///
/// With no focused cell, no selection and no open editor only undo/redo,
/// the save shortcut and arrow keys reach the grid; an arrow then lands on
/// the first cell.
pub fn global_command(input: &KeyInput, editing: bool, has_selection: bool, has_focus: bool) -> GridCommand {
    let command = command_for(input, editing, has_selection);
    if editing || has_selection || has_focus {
        return command;
    }
    match command {
        GridCommand::Undo | GridCommand::Redo | GridCommand::Swallow => command,
        GridCommand::Move { .. } if input.key.starts_with("Arrow") => command,
        _ => GridCommand::None,
    }
}

fn arrow(key: &str, extend: bool) -> GridCommand {
    let (rows, cols) = match key {
        "ArrowUp" => (-1, 0),
        "ArrowDown" => (1, 0),
        // RTL: left is the next column
        "ArrowLeft" => (0, 1),
        _ => (0, -1),
    };
    GridCommand::Move { rows, cols, extend }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 3] = ["r1", "r2", "r3"];
    const COLS: [&str; 3] = ["description", "location", "notes"];

    fn at(row: &str, field: &str) -> CellRef {
        CellRef::new(row, field)
    }

    #[test]
    fn test_no_focus_starts_at_first_cell() {
        let next = move_focus(None, &ROWS, &COLS, 1, 0, Overflow::Clamp);
        assert_eq!(next, Some(at("r1", "description")));
    }

    #[test]
    fn test_empty_grid_has_no_focus() {
        let rows: [&str; 0] = [];
        assert_eq!(move_focus(None, &rows, &COLS, 0, 1, Overflow::Clamp), None);
    }

    #[test]
    fn test_clamp_at_edges() {
        let last = at("r3", "notes");
        assert_eq!(move_focus(Some(&last), &ROWS, &COLS, 1, 0, Overflow::Clamp), Some(last.clone()));
        assert_eq!(move_focus(Some(&last), &ROWS, &COLS, 0, 1, Overflow::Clamp), Some(last));

        let first = at("r1", "description");
        assert_eq!(move_focus(Some(&first), &ROWS, &COLS, -1, -1, Overflow::Clamp), Some(first));
    }

    #[test]
    fn test_wrap_moves_to_next_and_previous_row() {
        let end_of_row = at("r1", "notes");
        assert_eq!(
            move_focus(Some(&end_of_row), &ROWS, &COLS, 0, 1, Overflow::Wrap),
            Some(at("r2", "description"))
        );

        let start_of_row = at("r2", "description");
        assert_eq!(
            move_focus(Some(&start_of_row), &ROWS, &COLS, 0, -1, Overflow::Wrap),
            Some(at("r1", "notes"))
        );
    }

    #[test]
    fn test_wrap_past_last_row_stays_on_last_row() {
        let last = at("r3", "notes");
        assert_eq!(
            move_focus(Some(&last), &ROWS, &COLS, 0, 1, Overflow::Wrap),
            Some(at("r3", "description"))
        );
    }

    #[test]
    fn test_missing_row_is_treated_as_before_first() {
        let gone = at("deleted", "location");
        assert_eq!(
            move_focus(Some(&gone), &ROWS, &COLS, 1, 0, Overflow::Clamp),
            Some(at("r1", "location"))
        );
    }

    #[test]
    fn test_arrows_are_right_to_left() {
        assert_eq!(
            command_for(&KeyInput::new("ArrowLeft"), false, false),
            GridCommand::Move { rows: 0, cols: 1, extend: false }
        );
        assert_eq!(
            command_for(&KeyInput::new("ArrowRight"), false, false),
            GridCommand::Move { rows: 0, cols: -1, extend: false }
        );
        assert_eq!(
            command_for(&KeyInput::new("ArrowDown").ctrl(), false, true),
            GridCommand::Move { rows: 1, cols: 0, extend: true }
        );
    }

    #[test]
    fn test_shortcuts_when_not_editing() {
        assert_eq!(command_for(&KeyInput::new("c").ctrl(), false, true), GridCommand::Copy);
        assert_eq!(command_for(&KeyInput::new("c").ctrl(), false, false), GridCommand::None);
        assert_eq!(command_for(&KeyInput::new("z").ctrl(), false, false), GridCommand::Undo);
        assert_eq!(command_for(&KeyInput::new("z").ctrl().shift(), false, false), GridCommand::Redo);
        assert_eq!(command_for(&KeyInput::new("y").ctrl(), false, false), GridCommand::Redo);
        assert_eq!(command_for(&KeyInput::new("s").ctrl(), false, false), GridCommand::Swallow);
        assert_eq!(command_for(&KeyInput::new("F2"), false, false), GridCommand::StartEdit);
        assert_eq!(command_for(&KeyInput::new("a"), false, false), GridCommand::StartEdit);
        assert_eq!(command_for(&KeyInput::new("Escape"), false, true), GridCommand::ClearSelection);
        assert_eq!(command_for(&KeyInput::new("Escape"), false, false), GridCommand::None);
    }

    #[test]
    fn test_editing_leaves_text_shortcuts_to_input() {
        assert_eq!(command_for(&KeyInput::new("z").ctrl(), true, false), GridCommand::None);
        assert_eq!(command_for(&KeyInput::new("c").ctrl(), true, true), GridCommand::None);
        assert_eq!(command_for(&KeyInput::new("s").ctrl(), true, false), GridCommand::Save);
        assert_eq!(command_for(&KeyInput::new("Escape"), true, false), GridCommand::Cancel);
        assert_eq!(
            command_for(&KeyInput::new("Enter"), true, false),
            GridCommand::SaveAndMove { rows: 1, cols: 0 }
        );
        assert_eq!(
            command_for(&KeyInput::new("Tab").shift(), true, false),
            GridCommand::SaveAndMove { rows: 0, cols: -1 }
        );
    }

    #[test]
    fn test_foreign_inputs_keep_plain_keys() {
        let mut input = KeyInput::new("ArrowDown");
        input.in_foreign_input = true;
        assert_eq!(command_for(&input, false, false), GridCommand::None);

        let mut undo = KeyInput::new("z").ctrl();
        undo.in_foreign_input = true;
        assert_eq!(command_for(&undo, false, false), GridCommand::Undo);
    }

    #[test]
    fn test_undo_redo_and_arrows_work_without_focus() {
        assert_eq!(global_command(&KeyInput::new("z").ctrl(), false, false, false), GridCommand::Undo);
        assert_eq!(global_command(&KeyInput::new("y").ctrl(), false, false, false), GridCommand::Redo);
        assert_eq!(global_command(&KeyInput::new("s").ctrl(), false, false, false), GridCommand::Swallow);
        assert_eq!(
            global_command(&KeyInput::new("ArrowDown"), false, false, false),
            GridCommand::Move { rows: 1, cols: 0, extend: false }
        );
    }

    #[test]
    fn test_typing_without_focus_is_left_to_the_page() {
        assert_eq!(global_command(&KeyInput::new("a"), false, false, false), GridCommand::None);
        assert_eq!(global_command(&KeyInput::new("Enter"), false, false, false), GridCommand::None);
        assert_eq!(global_command(&KeyInput::new("Tab"), false, false, false), GridCommand::None);

        let mut in_search = KeyInput::new("ArrowDown");
        in_search.in_foreign_input = true;
        assert_eq!(global_command(&in_search, false, false, false), GridCommand::None);
    }

    #[test]
    fn test_focused_grid_gets_full_key_map() {
        assert_eq!(global_command(&KeyInput::new("a"), false, false, true), GridCommand::StartEdit);
        assert_eq!(
            global_command(&KeyInput::new("Tab"), false, true, false),
            GridCommand::Move { rows: 0, cols: 1, extend: false }
        );
    }
}
