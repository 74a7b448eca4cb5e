use crate::pages::{DashboardPage, LoginPage, ProductEditorPage, ProductsPage, RootAuthed};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Router hooks used by the pages require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("products") view=move || view! {
                    <RootAuthed>
                        <ProductsPage />
                    </RootAuthed>
                } />
                <Route path=path!("products/new") view=move || view! {
                    <RootAuthed>
                        <ProductEditorPage />
                    </RootAuthed>
                } />
                <Route path=path!("products/:id/edit") view=move || view! {
                    <RootAuthed>
                        <ProductEditorPage />
                    </RootAuthed>
                } />
                <Route path=path!("") view=move || view! {
                    <RootAuthed>
                        <DashboardPage />
                    </RootAuthed>
                } />
            </Routes>
        </Router>
    }
}
