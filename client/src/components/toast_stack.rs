//! Toast stack bound to the toast queue in context.

use leptos::prelude::*;

use super::session::{use_toast_list, use_toasts};

#[component]
pub fn ToastStack() -> impl IntoView {
    let toasts = use_toast_list();
    let queue = use_toasts();

    view! {
        <div class="toast-stack">
            <For each=move || toasts.get() key=|toast| toast.id.clone() let:toast>
                {
                    let queue = queue.clone();
                    let id = toast.id.clone();
                    view! {
                        <div class=format!("toast toast--{}", toast.kind.as_str()) role="status">
                            <span>{toast.message.clone()}</span>
                            <button type="button" aria-label="Dismiss" on:click=move |_| queue.dismiss(&id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            </For>
        </div>
    }
}
