//! Grid Context Menu
//!
//! Right-click menu over the item grid: copy the selected cells, or bulk
//! edit and delete the checked rows.

use leptos::prelude::*;

/// Viewport coordinates of an open menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuPosition {
    pub x: i32,
    pub y: i32,
}

/// A right-click closes an open menu, otherwise opens one at the pointer
pub fn toggle_menu(open: Option<MenuPosition>, x: i32, y: i32) -> Option<MenuPosition> {
    match open {
        Some(_) => None,
        None => Some(MenuPosition { x, y }),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Copy,
    Edit,
    Delete,
}

impl MenuAction {
    pub fn label(self, count: usize) -> String {
        let name = match self {
            MenuAction::Copy => "העתק תאים",
            MenuAction::Edit => "עריכה",
            MenuAction::Delete => "מחיקה",
        };
        format!("{} ({})", name, count)
    }

    fn icon(self) -> &'static str {
        match self {
            MenuAction::Copy => "📋",
            MenuAction::Edit => "✏️",
            MenuAction::Delete => "🗑",
        }
    }

    fn class(self) -> &'static str {
        match self {
            MenuAction::Copy => "context-menu__item context-menu__item--copy",
            MenuAction::Edit => "context-menu__item context-menu__item--edit",
            MenuAction::Delete => "context-menu__item context-menu__item--delete",
        }
    }
}

/// Row actions are only offered when `can_edit` holds and a handler was given
#[component]
pub fn ContextMenu(
    position: RwSignal<Option<MenuPosition>>,
    #[prop(into)] cell_count: Signal<usize>,
    #[prop(into)] row_count: Signal<usize>,
    #[prop(into)] can_edit: Signal<bool>,
    on_copy: Callback<()>,
    on_edit: Option<Callback<()>>,
    on_delete: Option<Callback<()>>,
) -> impl IntoView {
    let entry = move |action: MenuAction, count: Signal<usize>, run: Callback<()>| {
        view! {
            <button
                class=action.class()
                disabled=move || count.get() == 0
                on:click=move |_| {
                    run.run(());
                    position.set(None);
                }
            >
                <span class="context-menu__icon">{action.icon()}</span>
                {move || action.label(count.get())}
            </button>
        }
    };
    let row_entry = move |action: MenuAction, run: Option<Callback<()>>| {
        run.map(|run| {
            view! {
                <Show when=move || can_edit.get()>
                    {entry(action, row_count, run)}
                </Show>
            }
        })
    };

    move || {
        position.get().map(|pos| {
            view! {
                <div
                    class="context-menu"
                    data-grid-keep=""
                    style=format!("top: {}px; left: {}px;", pos.y, pos.x)
                    on:contextmenu=|ev: leptos::ev::MouseEvent| ev.prevent_default()
                >
                    {entry(MenuAction::Copy, cell_count, on_copy)}
                    {row_entry(MenuAction::Edit, on_edit)}
                    {row_entry(MenuAction::Delete, on_delete)}
                </div>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_click_toggles() {
        let opened = toggle_menu(None, 40, 80);
        assert_eq!(opened, Some(MenuPosition { x: 40, y: 80 }));
        assert_eq!(toggle_menu(opened, 10, 10), None);
    }

    #[test]
    fn test_labels_carry_counts() {
        assert_eq!(MenuAction::Copy.label(3), "העתק תאים (3)");
        assert_eq!(MenuAction::Edit.label(0), "עריכה (0)");
        assert_eq!(MenuAction::Delete.label(2), "מחיקה (2)");
    }
}
