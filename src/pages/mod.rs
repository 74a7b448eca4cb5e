use crate::api::ProductRemote;
use crate::components::catalog::{ImagePreview, ProductCard, StatCard};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardGrid, CardHeader,
    CardTitle, ErrorAlert, FieldError, Input, Label, LoadingState, Spinner, TextArea,
};
use crate::drafts::image::{encode_image, BrowserFile, ImageSource};
use crate::drafts::{Field, FormPhase, LoginDraft, ProductForm};
use crate::state::catalog::SortKey;
use crate::state::messages::{user_message, CatalogOp};
use crate::state::stats::{summarize, LOW_STOCK_THRESHOLD};
use crate::state::AppContext;
use crate::util::format_money;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::params::Params;
use std::str::FromStr;
use wasm_bindgen::JsCast;

#[component]
pub fn LoginPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let pathname = use_location().pathname;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let draft = LoginDraft::new(username.get_untracked(), password.get_untracked());
        if let Some(msg) = draft.validate() {
            error.set(Some(msg.to_string()));
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(draft.username(), &draft.password).await {
                Ok(response) => {
                    app_state.0.current_user.set(Some(response.username));
                    app_state.0.api_client.set(api_client);
                    // `RootAuthed` renders this page in place; only the login route navigates.
                    if pathname.get_untracked() == "/login" {
                        navigate.with_value(|nav| nav("/", Default::default()));
                    }
                }
                Err(e) => {
                    error.set(Some(user_message(&e, CatalogOp::Login)));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <span class="text-sm font-medium text-foreground">"Catalog Admin"</span>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Sign in"</CardTitle>
                        <CardDescription class="text-xs">"Use your admin account to manage products."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="username" class="text-xs">"Username"</Label>
                                <Input
                                    id="username"
                                    placeholder="admin"
                                    value=username
                                    on_change=move |v: String| username.set(v)
                                    required=true
                                    autofocus=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    value=password
                                    on_change=move |v: String| password.set(v)
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <ErrorAlert message=error />

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let pathname = use_location().pathname;

    let nav_class = move |href: &'static str| {
        let p = pathname.get();
        let active = if href == "/" { p == "/" } else { p.starts_with(href) };
        if active {
            "rounded-md bg-accent px-3 py-1.5 text-sm font-medium text-accent-foreground"
        } else {
            "rounded-md px-3 py-1.5 text-sm text-muted-foreground hover:text-foreground"
        }
    };

    let on_logout = move |_| {
        app_state.logout();
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b">
                <div class="mx-auto flex h-14 max-w-6xl items-center justify-between gap-4 px-4">
                    <nav class="flex items-center gap-1">
                        <a href="/" class="mr-3 text-sm font-semibold">"Catalog Admin"</a>
                        <a href="/" class=move || nav_class("/")>"Dashboard"</a>
                        <a href="/products" class=move || nav_class("/products")>"Products"</a>
                    </nav>

                    <div class="flex items-center gap-3">
                        <span class="text-xs text-muted-foreground">
                            {move || app_state.0.current_user.get().unwrap_or_default()}
                        </span>
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_logout>
                            "Logout"
                        </Button>
                    </div>
                </div>
            </header>

            <main class="mx-auto max-w-6xl px-4 py-6">
                {children()}
            </main>
        </div>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <AppLayout>
                {move || children.with_value(|c| c())}
            </AppLayout>
        </Show>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let catalog = app_state.0.catalog;

    app_state.refresh_catalog();

    let stats = Memo::new(move |_| catalog.with(|c| summarize(c.products())));

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-xl font-semibold">"Dashboard"</h1>
                <a
                    href="/products/new"
                    class="inline-flex h-8 items-center rounded-md bg-primary px-3 text-sm font-medium text-primary-foreground hover:bg-primary/90"
                >
                    "Add Product"
                </a>
            </div>

            <ErrorAlert
                message=Signal::derive(move || catalog.with(|c| c.error().map(str::to_string)))
                on_dismiss=Callback::new(move |_| catalog.update(|c| c.clear_error()))
            />

            <Show
                when=move || catalog.with(|c| c.is_loaded() || c.error().is_some())
                fallback=|| view! { <LoadingState label="Loading dashboard..." /> }
            >
                <div class="grid gap-4 sm:grid-cols-3">
                    <StatCard
                        title="Total Products"
                        value=Signal::derive(move || stats.get().total_products.to_string())
                    />
                    <StatCard
                        title="Inventory Value"
                        value=Signal::derive(move || format_money(stats.get().total_value))
                    />
                    <StatCard
                        title="Low Stock"
                        value=Signal::derive(move || stats.get().low_stock.to_string())
                        hint=format!("Fewer than {LOW_STOCK_THRESHOLD} in stock")
                    />
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-base">"Recent Products"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        {move || {
                            let recent = stats.get().recent;
                            if recent.is_empty() {
                                return view! {
                                    <div class="text-sm text-muted-foreground">
                                        "No products yet. "
                                        <a class="text-primary underline underline-offset-4" href="/products/new">
                                            "Add your first product"
                                        </a>
                                    </div>
                                }
                                .into_any();
                            }

                            view! {
                                <ul class="divide-y">
                                    {recent
                                        .into_iter()
                                        .map(|p| {
                                            let href = p.id.map(|id| format!("/products/{id}/edit")).unwrap_or_default();
                                            view! {
                                                <li class="flex items-center justify-between py-2 text-sm">
                                                    <a class="truncate font-medium hover:underline" href=href>{p.name}</a>
                                                    <span class="text-muted-foreground">
                                                        {format!("{} · Qty {}", format_money(p.price), p.quantity)}
                                                    </span>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            }
                            .into_any()
                        }}
                    </CardContent>
                </Card>
            </Show>
        </div>
    }
}

#[component]
pub fn ProductsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let catalog = app_state.0.catalog;

    app_state.refresh_catalog();

    let on_delete = Callback::new(move |id: i64| {
        let confirmed = window()
            .confirm_with_message("Are you sure you want to delete this product?")
            .unwrap_or(false);
        if confirmed {
            app_state.delete_product(id);
        }
    });

    let on_sort = move |ev: web_sys::Event| {
        let Some(select) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        else {
            return;
        };
        if let Ok(sort) = SortKey::from_str(&select.value()) {
            catalog.update(|c| c.set_sort(sort));
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-xl font-semibold">"Products"</h1>
                <a
                    href="/products/new"
                    class="inline-flex h-8 items-center rounded-md bg-primary px-3 text-sm font-medium text-primary-foreground hover:bg-primary/90"
                >
                    "Add Product"
                </a>
            </div>

            <div class="flex flex-col gap-2 sm:flex-row sm:items-center">
                <Input
                    r#type="search"
                    placeholder="Search products..."
                    class="sm:max-w-xs"
                    value=Signal::derive(move || catalog.with(|c| c.filter().to_string()))
                    on_change=move |v: String| catalog.update(|c| c.set_filter(v))
                />
                <select
                    class="h-9 rounded-md border border-input bg-transparent px-3 text-sm shadow-xs"
                    on:change=on_sort
                >
                    {SortKey::all()
                        .map(|key| {
                            let value: &str = key.as_ref();
                            let value = value.to_string();
                            view! {
                                <option
                                    value=value
                                    selected=move || catalog.with(|c| c.sort() == key)
                                >
                                    {key.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <div class="text-xs text-muted-foreground sm:ml-auto">
                    {move || catalog.with(|c| format!(
                        "Showing {} of {} products",
                        c.visible().len(),
                        c.products().len()
                    ))}
                </div>
            </div>

            <ErrorAlert
                message=Signal::derive(move || catalog.with(|c| c.error().map(str::to_string)))
                on_dismiss=Callback::new(move |_| catalog.update(|c| c.clear_error()))
            />

            {move || {
                let (loaded, visible, total) =
                    catalog.with(|c| (c.is_loaded(), c.visible().to_vec(), c.products().len()));

                if !loaded {
                    if catalog.with(|c| c.is_loading()) {
                        return view! { <LoadingState label="Loading products..." /> }.into_any();
                    }
                    return ().into_any();
                }

                if visible.is_empty() {
                    let text = if total == 0 {
                        "No products yet."
                    } else {
                        "No products match your search."
                    };
                    return view! {
                        <div class="py-12 text-center text-sm text-muted-foreground">{text}</div>
                    }
                    .into_any();
                }

                view! {
                    <CardGrid>
                        {visible
                            .into_iter()
                            .map(|product| view! { <ProductCard product=product on_delete=on_delete /> })
                            .collect_view()}
                    </CardGrid>
                }
                .into_any()
            }}
        </div>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct ProductRouteParams {
    pub id: Option<String>,
}

/// Create (`/products/new`) and edit (`/products/:id/edit`) share this page.
#[component]
pub fn ProductEditorPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = leptos_router::hooks::use_params::<ProductRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    let form: RwSignal<ProductForm> = RwSignal::new(ProductForm::new());
    let record_loading: RwSignal<bool> = RwSignal::new(false);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    // Guards against a slow fetch for a previous `:id`.
    let load_request_id: RwSignal<u64> = RwSignal::new(0);

    let product_id = move || params.get().ok().and_then(|p| p.id);

    Effect::new(move |_| {
        let rid = load_request_id.get_untracked().saturating_add(1);
        load_request_id.set(rid);
        load_error.set(None);

        let Some(raw) = product_id() else {
            form.update(|f| f.initialize(None));
            record_loading.set(false);
            return;
        };

        let Ok(id) = raw.parse::<i64>() else {
            form.update(|f| f.cancel());
            load_error.set(Some("Product not found.".to_string()));
            return;
        };

        record_loading.set(true);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.get_product(id).await;

            // Ignore stale responses.
            if load_request_id.get_untracked() != rid {
                return;
            }

            match result {
                Ok(product) => form.update(|f| f.initialize(Some(&product))),
                Err(e) => {
                    if !app_state.handle_unauthorized(&e) {
                        load_error.set(Some(user_message(&e, CatalogOp::LoadOne)));
                    }
                }
            }
            record_loading.set(false);
        });
    });

    let is_edit = move || product_id().is_some();
    let busy = move || form.with(|f| f.phase() == FormPhase::Submitting);

    let draft_text = move |field: Field| {
        Signal::derive(move || {
            form.with(|f| {
                let d = f.draft();
                match field {
                    Field::Name => d.name.clone(),
                    Field::Description => d.description.clone(),
                    Field::Price => d.price.clone(),
                    Field::Quantity => d.quantity.clone(),
                    Field::Category => d.category.clone(),
                    Field::Image => String::new(),
                }
            })
        })
    };
    let field_error =
        move |field: Field| Signal::derive(move || form.with(|f| f.error(field).map(str::to_string)));
    let has_error = move |field: Field| Signal::derive(move || form.with(|f| f.error(field).is_some()));
    let on_field = move |field: Field| {
        Callback::new(move |v: String| form.update(|f| f.field_changed(field, v)))
    };

    let on_file = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Allow re-selecting the same file after a rejection.
        input.set_value("");

        let file = BrowserFile(file);
        let ticket = form
            .try_update(|f| f.begin_image(&file.media_type(), file.size()))
            .flatten();
        let Some(ticket) = ticket else {
            return;
        };

        spawn_local(async move {
            let result = encode_image(&file).await;
            form.update(|f| {
                f.finish_image(ticket, result);
            });
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(Ok(request)) = form.try_update(|f| f.begin_submit()) else {
            return;
        };

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let op = request.op();
            let result = request.send(&api_client).await;
            if let Err(e) = &result {
                if app_state.handle_unauthorized(e) {
                    return;
                }
            }

            let saved = form.try_update(|f| f.finish_submit(op, result).is_ok());
            if saved == Some(true) {
                navigate.with_value(|nav| nav("/products", Default::default()));
            }
        });
    };

    // Buttons inside the form default to submit.
    let on_reset = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        form.update(|f| f.reset());
    };
    let on_cancel = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        form.update(|f| f.cancel());
        navigate.with_value(|nav| nav("/products", Default::default()));
    };

    view! {
        <div class="mx-auto max-w-2xl space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-xl font-semibold">
                    {move || if is_edit() { "Edit Product" } else { "Add Product" }}
                </h1>
                <a href="/products" class="text-sm text-muted-foreground hover:text-foreground">"Back to products"</a>
            </div>

            <ErrorAlert message=load_error />

            <Show
                when=move || !record_loading.get()
                fallback=|| view! { <LoadingState label="Loading product..." /> }
            >
                <Show when=move || form.with(|f| f.phase() != FormPhase::Empty) fallback=|| ().into_view()>
                    <Card>
                        <CardContent>
                            <form class="flex flex-col gap-4" on:submit=on_submit>
                                <ErrorAlert message=Signal::derive(move || form.with(|f| f.submit_error().map(str::to_string))) />

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="name" required=true>"Name"</Label>
                                    <Input
                                        id="name"
                                        name=Field::Name.to_string()
                                        value=draft_text(Field::Name)
                                        on_change=on_field(Field::Name)
                                        invalid=has_error(Field::Name)
                                        disabled=Signal::derive(busy)
                                    />
                                    <FieldError message=field_error(Field::Name) />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="description">"Description"</Label>
                                    <TextArea
                                        id="description"
                                        name=Field::Description.to_string()
                                        rows=4
                                        value=draft_text(Field::Description)
                                        on_change=on_field(Field::Description)
                                        disabled=Signal::derive(busy)
                                    />
                                </div>

                                <div class="grid gap-4 sm:grid-cols-2">
                                    <div class="flex flex-col gap-1.5">
                                        <Label html_for="price" required=true>"Price"</Label>
                                        <Input
                                            id="price"
                                            r#type="number"
                                            name=Field::Price.to_string()
                                            min="0"
                                            step="0.01"
                                            value=draft_text(Field::Price)
                                            on_change=on_field(Field::Price)
                                            invalid=has_error(Field::Price)
                                            disabled=Signal::derive(busy)
                                        />
                                        <FieldError message=field_error(Field::Price) />
                                    </div>

                                    <div class="flex flex-col gap-1.5">
                                        <Label html_for="quantity" required=true>"Quantity"</Label>
                                        <Input
                                            id="quantity"
                                            r#type="number"
                                            name=Field::Quantity.to_string()
                                            min="0"
                                            step="1"
                                            value=draft_text(Field::Quantity)
                                            on_change=on_field(Field::Quantity)
                                            invalid=has_error(Field::Quantity)
                                            disabled=Signal::derive(busy)
                                        />
                                        <FieldError message=field_error(Field::Quantity) />
                                    </div>
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="category">"Category"</Label>
                                    <Input
                                        id="category"
                                        name=Field::Category.to_string()
                                        value=draft_text(Field::Category)
                                        on_change=on_field(Field::Category)
                                        disabled=Signal::derive(busy)
                                    />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="image">"Image"</Label>
                                    <input
                                        id="image"
                                        type="file"
                                        accept="image/*"
                                        class="text-sm file:mr-3 file:rounded-md file:border file:bg-background file:px-3 file:py-1 file:text-sm"
                                        disabled=busy
                                        on:change=on_file
                                    />
                                    <Show when=move || form.with(|f| f.is_image_pending()) fallback=|| ().into_view()>
                                        <span class="inline-flex items-center gap-2 text-xs text-muted-foreground">
                                            <Spinner class="size-3" />
                                            "Processing image..."
                                        </span>
                                    </Show>
                                    <FieldError message=field_error(Field::Image) />
                                    <ImagePreview
                                        image=Signal::derive(move || form.with(|f| f.draft().image.clone()))
                                        on_remove=move |_| form.update(|f| f.remove_image())
                                    />
                                </div>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Ghost
                                        size=ButtonSize::Sm
                                        attr:disabled=busy
                                        on:click=on_cancel
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:disabled=busy
                                        on:click=on_reset
                                    >
                                        "Reset"
                                    </Button>
                                    <Button
                                        size=ButtonSize::Sm
                                        attr:disabled=move || busy() || form.with(|f| f.is_image_pending())
                                    >
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=busy fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            {move || match (busy(), is_edit()) {
                                                (true, _) => "Saving...",
                                                (false, true) => "Update Product",
                                                (false, false) => "Create Product",
                                            }}
                                        </span>
                                    </Button>
                                </div>
                            </form>
                        </CardContent>
                    </Card>
                </Show>
            </Show>
        </div>
    }
}
