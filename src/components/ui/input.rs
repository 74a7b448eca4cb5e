use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const FIELD_CLASS: &str = "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground border-input w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2 aria-invalid:ring-destructive/20 aria-invalid:border-destructive";

fn aria_invalid(invalid: MaybeProp<bool>) -> impl Fn() -> Option<&'static str> {
    move || invalid.get().unwrap_or(false).then_some("true")
}

#[component]
pub fn Input(
    #[prop(into, optional)] class: String,

    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] name: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] min: String,
    #[prop(into, optional)] step: String,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
    #[prop(optional)] required: bool,
    #[prop(optional)] autofocus: bool,
    /// Sets `aria-invalid`, which switches the border to the error color.
    #[prop(into, optional)] invalid: MaybeProp<bool>,

    // Controlled input: `value` is rendered, edits are reported through `on_change`.
    // `bind:value` differs across Leptos versions.
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "flex h-9", class);

    let on_input = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        on_change.run(input.value());
    };

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            name=name
            id=id
            min=(!min.is_empty()).then_some(min)
            step=(!step.is_empty()).then_some(step)
            disabled=move || disabled.get().unwrap_or(false)
            required=required
            autofocus=autofocus
            aria-invalid=aria_invalid(invalid)
            prop:value=move || value.get()
            on:input=on_input
        />
    }
}

#[component]
pub fn TextArea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] name: String,
    #[prop(into, optional)] id: String,
    #[prop(default = 3)] rows: u32,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
    #[prop(into, optional)] invalid: MaybeProp<bool>,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "min-h-16 py-2", class);

    let on_input = move |ev: web_sys::Event| {
        let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            return;
        };
        on_change.run(area.value());
    };

    view! {
        <textarea
            data-name="TextArea"
            class=merged_class
            placeholder=placeholder
            name=name
            id=id
            rows=rows
            disabled=move || disabled.get().unwrap_or(false)
            aria-invalid=aria_invalid(invalid)
            prop:value=move || value.get()
            on:input=on_input
        />
    }
}

/// Inline validation message under a field.
#[component]
pub fn FieldError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        {move || message.get().map(|m| view! { <p class="text-xs text-destructive">{m}</p> })}
    }
}
