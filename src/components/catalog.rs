use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader,
    CardMedia, CardTitle,
};
use crate::models::{EncodedImage, Product};
use crate::state::stats::LOW_STOCK_THRESHOLD;
use crate::util::format_money;
use icons::X;
use leptos::prelude::*;

#[component]
pub fn ProductCard(product: Product, #[prop(into)] on_delete: Callback<i64>) -> impl IntoView {
    let id = product.id;
    let qty_class = if product.quantity < LOW_STOCK_THRESHOLD {
        "text-xs text-destructive"
    } else {
        "text-xs text-muted-foreground"
    };
    let image = product.image();
    let name = product.name.clone();
    let edit_href = id.map(|id| format!("/products/{id}/edit"));

    view! {
        <Card class="overflow-hidden pt-0">
            <CardMedia>
                {match image {
                    Some(img) => view! {
                        <img class="h-full w-full object-cover" src=img.data_url() alt=name.clone() />
                    }
                    .into_any(),
                    None => view! {
                        <div class="flex h-full items-center justify-center text-xs text-muted-foreground">
                            "No image"
                        </div>
                    }
                    .into_any(),
                }}
            </CardMedia>

            <CardHeader>
                <CardTitle class="truncate text-base">{product.name}</CardTitle>
                <CardDescription class="line-clamp-2 text-xs">{product.description}</CardDescription>
            </CardHeader>

            <CardContent class="flex flex-wrap items-center gap-2 text-sm">
                <span class="font-semibold">{format_money(product.price)}</span>
                <span class=qty_class>
                    {format!("Qty: {}", product.quantity)}
                </span>
                {product.category.map(|c| view! {
                    <span class="rounded-full bg-secondary px-2 py-0.5 text-xs text-secondary-foreground">{c}</span>
                })}
            </CardContent>

            <CardFooter class="mt-auto justify-end">
                {edit_href.map(|href| view! {
                    <a
                        href=href
                        class="inline-flex h-8 items-center rounded-md border bg-background px-3 text-sm font-medium shadow-xs hover:bg-accent"
                    >
                        "Edit"
                    </a>
                })}
                {id.map(|id| view! {
                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        on:click=move |_| on_delete.run(id)
                    >
                        "Delete"
                    </Button>
                })}
            </CardFooter>
        </Card>
    }
}

#[component]
pub fn StatCard(
    #[prop(into)] title: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into, optional)] hint: String,
) -> impl IntoView {
    view! {
        <Card class="gap-2 py-4">
            <CardHeader class="px-4">
                <CardDescription class="text-xs uppercase tracking-wide">{title}</CardDescription>
                <CardTitle class="text-2xl">{move || value.get()}</CardTitle>
            </CardHeader>
            {(!hint.is_empty()).then(|| view! {
                <CardContent class="px-4 text-xs text-muted-foreground">{hint}</CardContent>
            })}
        </Card>
    }
}

/// Thumbnail of the draft's image with a remove button.
#[component]
pub fn ImagePreview(
    #[prop(into)] image: Signal<Option<EncodedImage>>,
    #[prop(into)] on_remove: Callback<()>,
) -> impl IntoView {
    view! {
        {move || image.get().map(|img| view! {
            <div class="relative inline-block">
                <img
                    class="h-32 w-32 rounded-md border object-cover"
                    src=img.data_url()
                    alt="Product preview"
                />
                <Button
                    variant=ButtonVariant::Secondary
                    size=ButtonSize::Icon
                    class="absolute -right-2 -top-2 size-6 rounded-full"
                    attr:title="Remove image"
                    on:click=move |ev: web_sys::MouseEvent| {
                        // Inside the editor form; do not submit it.
                        ev.prevent_default();
                        on_remove.run(());
                    }
                >
                    <X class="size-3" />
                </Button>
            </div>
        })}
    }
}
