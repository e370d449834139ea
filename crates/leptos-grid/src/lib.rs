//! Leptos Grid Utilities
//!
//! Spreadsheet-style cell selection and keyboard navigation for tables.
//! The state machines in [`selection`] and [`nav`] are plain Rust; this file
//! wraps them in signals and binds the mouse and keyboard events.

pub mod nav;
pub mod selection;

pub use nav::{command_for, global_command, move_focus, GridCommand, KeyInput, Overflow};
pub use selection::{toggle_focus, CellRef, SelectedCell, Selection};

use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Elements that keep the selection alive when clicked
pub const KEEP_SELECTION_SELECTOR: &str =
    "td, input, textarea, select, button, .context-menu, [data-grid-keep]";

/// Grid state signals
#[derive(Clone, Copy)]
pub struct GridSignals {
    pub selection: RwSignal<Selection>,
    pub focused: RwSignal<Option<CellRef>>,
}

pub fn create_grid_signals() -> GridSignals {
    GridSignals {
        selection: RwSignal::new(Selection::new()),
        focused: RwSignal::new(None),
    }
}

impl GridSignals {
    /// Reactive check used by cell class bindings
    pub fn is_selected(&self, cell: &CellRef) -> bool {
        self.selection.with(|s| s.is_selected(cell))
    }

    pub fn is_focused(&self, cell: &CellRef) -> bool {
        self.focused.with(|f| f.as_ref() == Some(cell))
    }

    pub fn focus(&self, cell: CellRef) {
        self.focused.update(|f| *f = toggle_focus(f.as_ref(), cell));
    }

    pub fn set_focus(&self, cell: Option<CellRef>) {
        self.focused.set(cell);
    }

    pub fn clear(&self) {
        self.selection.update(|s| s.clear());
        self.focused.set(None);
    }

    /// Move focus and return the new focused cell
    pub fn move_by<R, C>(
        &self,
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
        let current = self.focused.get_untracked();
        let next = move_focus(current.as_ref(), rows, columns, row_delta, col_delta, overflow);
        if next.is_some() {
            self.focused.set(next.clone());
        }
        next
    }

    /// Keyboard move. `value_of` reads the landing cell's text when a
    /// ctrl-move adds it to the selection; a plain move clears it.
    pub fn navigate<R, C>(
        &self,
        rows: &[R],
        columns: &[C],
        row_delta: i32,
        col_delta: i32,
        extend: bool,
        value_of: impl Fn(&CellRef) -> String,
    ) -> Option<CellRef>
    where
        R: AsRef<str>,
        C: AsRef<str>,
    {
        let next = self.move_by(rows, columns, row_delta, col_delta, Overflow::Clamp)?;
        if extend || self.selection.with_untracked(|s| !s.is_empty()) {
            let value = value_of(&next);
            self.selection.update(|s| s.moved_to(next.clone(), value, extend));
        }
        Some(next)
    }

    /// Tab-joined values of the selected cells
    pub fn copy_text(&self) -> String {
        self.selection.with_untracked(|s| s.copy_text())
    }
}

fn is_additive(ev: &web_sys::MouseEvent) -> bool {
    ev.ctrl_key() || ev.meta_key()
}

/// Create mousedown handler for a table cell
pub fn make_on_cell_mousedown(
    grid: GridSignals,
    cell: CellRef,
    value: String,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        let additive = is_additive(&ev);
        if additive {
            // Keep the browser from starting a text selection while dragging
            ev.prevent_default();
        }
        grid.selection
            .update(|s| s.mouse_down(cell.clone(), value.clone(), additive));
    }
}

/// Create mouseenter handler for a table cell
pub fn make_on_cell_mouseenter(
    grid: GridSignals,
    cell: CellRef,
    value: String,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if !grid.selection.with_untracked(|s| s.is_dragging()) {
            return;
        }
        let additive = is_additive(&ev);
        grid.selection
            .update(|s| s.mouse_enter(cell.clone(), value.clone(), additive));
    }
}

/// End ctrl-drag on any mouseup. Removed when the owner is disposed.
pub fn bind_global_mouseup(grid: GridSignals) {
    let handle = window_event_listener(ev::mouseup, move |_ev| {
        if grid.selection.with_untracked(|s| s.is_dragging()) {
            grid.selection.update(|s| s.mouse_up());
        }
    });
    on_cleanup(move || handle.remove());
}

/// Clear selection and focus when the user clicks outside the grid
pub fn bind_global_mousedown_clear(grid: GridSignals) {
    let handle = window_event_listener(ev::mousedown, move |ev| {
        let inside = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| matches!(el.closest(KEEP_SELECTION_SELECTOR), Ok(Some(_))))
            .unwrap_or(false);
        if inside {
            return;
        }
        let has_state = grid.selection.with_untracked(|s| !s.is_empty())
            || grid.focused.with_untracked(|f| f.is_some());
        if has_state {
            grid.clear();
        }
    });
    on_cleanup(move || handle.remove());
}

/// Read the key event into a [`KeyInput`]
pub fn key_input(ev: &web_sys::KeyboardEvent, editing: bool) -> KeyInput {
    let in_input = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
        .unwrap_or(false);
    KeyInput {
        key: ev.key(),
        ctrl: ev.ctrl_key() || ev.meta_key(),
        shift: ev.shift_key(),
        alt: ev.alt_key(),
        in_foreign_input: in_input && !editing,
    }
}

/// Bind the grid key map on the window.
///
/// `editing` reports whether a cell editor is open. Keys are decoded with
/// [`global_command`], so undo/redo and arrows work before anything is
/// focused; `on_command` receives everything except [`GridCommand::None`].
pub fn bind_global_keydown<E, F>(grid: GridSignals, editing: E, on_command: F)
where
    E: Fn() -> bool + 'static,
    F: Fn(GridCommand) + 'static,
{
    let handle = window_event_listener(ev::keydown, move |ev| {
        let has_selection = grid.selection.with_untracked(|s| !s.is_empty());
        let has_focus = grid.focused.with_untracked(|f| f.is_some());
        let editing = editing();
        let command = global_command(&key_input(&ev, editing), editing, has_selection, has_focus);
        if command == GridCommand::None {
            return;
        }
        if command.prevents_default() {
            ev.prevent_default();
        }
        on_command(command);
    });
    on_cleanup(move || handle.remove());
}
