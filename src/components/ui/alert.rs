use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;

/// Dismissable error banner. Renders nothing while `message` is `None`.
#[component]
pub fn ErrorAlert(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        {move || {
            message.get().map(|text| {
                view! {
                    <Alert class="flex items-start justify-between gap-3 border-destructive/30 bg-destructive/5">
                        <AlertDescription class="text-xs text-destructive">{text}</AlertDescription>
                        {on_dismiss.map(|cb| {
                            view! {
                                <button
                                    type="button"
                                    class="text-xs text-destructive/80 hover:text-destructive"
                                    aria-label="Dismiss"
                                    on:click=move |_| cb.run(())
                                >
                                    "×"
                                </button>
                            }
                        })}
                    </Alert>
                }
            })
        }}
    }
}
