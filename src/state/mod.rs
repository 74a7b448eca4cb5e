pub mod catalog;
pub mod messages;
pub mod stats;

use crate::api::{ApiClient, ApiError, ApiErrorKind, ProductRemote};
use catalog::CatalogView;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    /// Username of the stored credential, when it is still valid.
    pub current_user: RwSignal<Option<String>>,

    /// Fetched catalog shared by the dashboard and the product list.
    pub catalog: RwSignal<CatalogView>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_client(ApiClient::from_env())
    }

    pub fn with_client(api_client: ApiClient) -> Self {
        // `is_valid` drops an expired token before the first render.
        let current_user = if api_client.is_authenticated() {
            api_client.credentials().username()
        } else {
            None
        };

        Self {
            api_client: RwSignal::new(api_client),
            current_user: RwSignal::new(current_user),
            catalog: RwSignal::new(CatalogView::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

impl AppContext {
    /// Clears the stored credential and every piece of session state.
    pub fn logout(&self) {
        let state = &self.0;
        state.api_client.with_untracked(|c| c.logout());
        // Notify `RootAuthed`, which reads authentication through this signal.
        state.api_client.update(|_| {});
        state.current_user.set(None);
        state.catalog.update(|c| c.reset());
    }

    /// Logs out on a rejected session. Returns whether it did.
    pub fn handle_unauthorized(&self, err: &ApiError) -> bool {
        if err.kind != ApiErrorKind::Unauthorized {
            return false;
        }
        leptos::logging::warn!("session rejected by the server; logging out");
        self.logout();
        true
    }

    /// Starts a catalog fetch. Responses older than one already applied are dropped.
    pub fn refresh_catalog(&self) {
        let ticket = self.0.catalog.try_update(|c| c.begin_refresh());
        let Some(ticket) = ticket else {
            return;
        };

        let app = *self;
        let api_client = self.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.list_products().await;
            if let Err(e) = &result {
                if app.handle_unauthorized(e) {
                    return;
                }
            }
            app.0.catalog.update(|c| {
                c.finish_refresh(ticket, result);
            });
        });
    }

    /// Deletes remotely, then refreshes. The grid only changes through that refresh.
    pub fn delete_product(&self, id: i64) {
        let app = *self;
        let api_client = self.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.delete_product(id).await {
                Ok(()) => app.refresh_catalog(),
                Err(e) => {
                    if !app.handle_unauthorized(&e) {
                        app.0.catalog.update(|c| c.delete_failed(&e));
                    }
                }
            }
        });
    }
}
