//! Pager Component
//!
//! Previous/next buttons, page indicator and page-size select for the paged
//! tables.

use leptos::prelude::*;

use crate::pagination::Pagination;

#[component]
pub fn Pager(
    pagination: RwSignal<Pagination>,
    #[prop(into)] total: Signal<u64>,
    #[prop(optional)] page_sizes: Vec<u64>,
) -> impl IntoView {
    let total_pages = move || pagination.with(|p| p.total_pages(total.get()));
    let range = move || {
        let (from, to) = pagination.with(|p| p.range(total.get()));
        format!("{}-{} מתוך {}", from, to, total.get())
    };

    view! {
        <div class="pager">
            <button
                disabled=move || pagination.with(|p| p.page <= 1)
                on:click=move |_| pagination.update(|p| p.prev())
            >
                "הקודם"
            </button>
            <span class="pager-page">
                {move || format!("עמוד {} מתוך {}", pagination.with(|p| p.page), total_pages())}
            </span>
            <button
                disabled=move || !pagination.with(|p| p.has_next(total.get()))
                on:click=move |_| pagination.update(|p| p.next())
            >
                "הבא"
            </button>
            <span class="pager-range">{range}</span>
            {(!page_sizes.is_empty()).then(|| view! {
                <select
                    class="pager-size"
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<u64>() {
                            pagination.update(|p| p.set_per_page(size));
                        }
                    }
                >
                    {page_sizes
                        .iter()
                        .map(|size| {
                            let size = *size;
                            view! {
                                <option
                                    value=size.to_string()
                                    selected=move || pagination.with(|p| p.per_page == size)
                                >
                                    {size}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            })}
        </div>
    }
}
