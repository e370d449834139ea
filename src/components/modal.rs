//! Modal Component
//!
//! Overlay dialog; clicking the backdrop or the close button calls `on_close`.

use leptos::prelude::*;

#[component]
pub fn Modal(
    #[prop(into)] show: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional, into)] wide: bool,
    children: ChildrenFn,
) -> impl IntoView {
    let children = StoredValue::new(children);

    view! {
        <Show when=move || show.get()>
            <div class="modal-backdrop" data-grid-keep="" on:click=move |_| on_close.run(())>
                <div
                    class=if wide { "modal modal-wide" } else { "modal" }
                    on:click=|ev| ev.stop_propagation()
                >
                    <div class="modal-header">
                        <h2>{move || title.get()}</h2>
                        <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                    </div>
                    <div class="modal-body">{children.with_value(|children| children())}</div>
                </div>
            </div>
        </Show>
    }
}
