//! Page navigation control for paged tables.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owners keep the current page; this control only reports the page the user
//! picked through `on_change`. The window of numbered buttons comes from
//! `util::pagination`.

use leptos::prelude::*;

use crate::util::pagination::{
    DEFAULT_MAX_VISIBLE, PageItem, has_next, has_previous, next_page, page_items, previous_page,
};

#[component]
pub fn Pagination(
    #[prop(into)] current: Signal<u32>,
    #[prop(into)] total: Signal<u32>,
    on_change: Callback<u32>,
    #[prop(default = true)] show_first_last: bool,
    #[prop(default = DEFAULT_MAX_VISIBLE)] max_visible: u32,
) -> impl IntoView {
    let at_start = move || !has_previous(current.get());
    let at_end = move || !has_next(current.get(), total.get());

    let pages = move || {
        let active = current.get();
        page_items(active, total.get(), max_visible)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(page) => view! {
                    <button
                        type="button"
                        class=if page == active { "pagination__page pagination__page--active" } else { "pagination__page" }
                        aria-label=format!("Page {page}")
                        aria-current=(page == active).then_some("page")
                        on:click=move |_| on_change.run(page)
                    >
                        {page}
                    </button>
                }
                .into_any(),
                PageItem::Ellipsis => view! { <span class="pagination__ellipsis">"..."</span> }.into_any(),
            })
            .collect_view()
    };

    view! {
        <nav class="pagination" aria-label="Pagination">
            <Show when=move || show_first_last>
                <button
                    type="button"
                    class="pagination__step"
                    aria-label="First page"
                    disabled=at_start
                    on:click=move |_| on_change.run(1)
                >
                    "«"
                </button>
            </Show>
            <button
                type="button"
                class="pagination__step"
                aria-label="Previous page"
                disabled=at_start
                on:click=move |_| on_change.run(previous_page(current.get_untracked()))
            >
                "‹"
            </button>
            {pages}
            <button
                type="button"
                class="pagination__step"
                aria-label="Next page"
                disabled=at_end
                on:click=move |_| on_change.run(next_page(current.get_untracked(), total.get_untracked()))
            >
                "›"
            </button>
            <Show when=move || show_first_last>
                <button
                    type="button"
                    class="pagination__step"
                    aria-label="Last page"
                    disabled=at_end
                    on:click=move |_| on_change.run(total.get_untracked())
                >
                    "»"
                </button>
            </Show>
            <span class="pagination__label">{move || format!("Page {} of {}", current.get(), total.get())}</span>
        </nav>
    }
}
