//! Grid Overlays
//!
//! Floating undo/redo buttons and the multi-cell selection counter shown
//! over the item grid.

use leptos::prelude::*;

pub fn selection_label(count: usize) -> Option<String> {
    (count > 0).then(|| format!("{} תאים נבחרו (Ctrl+C להעתקה)", count))
}

/// Hidden while there is nothing to undo or redo
#[component]
pub fn FloatingToolbar(
    #[prop(into)] can_undo: Signal<bool>,
    #[prop(into)] can_redo: Signal<bool>,
    on_undo: Callback<()>,
    on_redo: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || can_undo.get() || can_redo.get()>
            <div class="floating-toolbar" data-grid-keep="">
                <button
                    class="toolbar-btn"
                    title="ביטול (Ctrl+Z)"
                    disabled=move || !can_undo.get()
                    on:click=move |_| on_undo.run(())
                >
                    "↶"
                </button>
                <button
                    class="toolbar-btn"
                    title="חזרה (Ctrl+Y)"
                    disabled=move || !can_redo.get()
                    on:click=move |_| on_redo.run(())
                >
                    "↷"
                </button>
            </div>
        </Show>
    }
}

#[component]
pub fn SelectionIndicator(#[prop(into)] count: Signal<usize>) -> impl IntoView {
    move || {
        selection_label(count.get()).map(|label| view! { <div class="selection-indicator">{label}</div> })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_label() {
        assert_eq!(selection_label(0), None);
        assert_eq!(selection_label(4).as_deref(), Some("4 תאים נבחרו (Ctrl+C להעתקה)"));
    }
}
