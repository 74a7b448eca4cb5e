use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "bg-card text-card-foreground flex flex-col gap-4 rounded-xl border py-6 shadow-sm"}
    clx! {CardHeader, div, "flex flex-col items-start gap-1.5 px-6"}
    clx! {CardTitle, h2, "leading-none font-semibold"}
    clx! {CardDescription, p, "text-muted-foreground text-sm"}
    clx! {CardContent, div, "px-6"}
    clx! {CardFooter, footer, "flex items-center px-6", "gap-2"}

    // Product grid
    clx! {CardGrid, div, "grid gap-4 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4"}
    clx! {CardMedia, div, "relative -mt-6 aspect-[4/3] overflow-hidden rounded-t-xl bg-muted"}
}

pub use components::*;
