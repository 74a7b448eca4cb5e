use crate::api::{ApiError, ApiResult, ProductRemote};
use crate::models::Product;
use crate::state::messages::{user_message, CatalogOp};
use std::cmp::Ordering;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Ordering of the product grid. The string form is the `<select>` option value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, AsRefStr, EnumString, EnumIter)]
pub enum SortKey {
    #[default]
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "price-low")]
    PriceLowHigh,
    #[strum(serialize = "price-high")]
    PriceHighLow,
    #[strum(serialize = "quantity")]
    QuantityHighLow,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Sort by Name",
            SortKey::PriceLowHigh => "Price: Low to High",
            SortKey::PriceHighLow => "Price: High to Low",
            SortKey::QuantityHighLow => "Quantity: High to Low",
        }
    }

    pub fn all() -> impl Iterator<Item = SortKey> {
        SortKey::iter()
    }

    /// Equal keys compare `Equal` so a stable sort keeps server order.
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::PriceLowHigh => a.price.total_cmp(&b.price),
            SortKey::PriceHighLow => b.price.total_cmp(&a.price),
            SortKey::QuantityHighLow => b.quantity.cmp(&a.quantity),
        }
    }
}

/// Case-insensitive substring match on name or description; order preserved.
pub fn filter_products(products: &[Product], filter: &str) -> Vec<Product> {
    let needle = filter.to_lowercase();
    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn sort_products(products: &mut [Product], sort: SortKey) {
    // `sort_by` is stable.
    products.sort_by(|a, b| sort.compare(a, b));
}

/// The visible projection: always rebuilt from its three inputs.
pub fn derive_view(products: &[Product], filter: &str, sort: SortKey) -> Vec<Product> {
    let mut out = filter_products(products, filter);
    sort_products(&mut out, sort);
    out
}

/// Handed out by [`CatalogView::begin_refresh`]; orders overlapping fetches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Product list page state: fetched collection, search/sort inputs and the derived view.
#[derive(Clone, Debug, Default)]
pub struct CatalogView {
    products: Vec<Product>,
    filter: String,
    sort: SortKey,
    visible: Vec<Product>,
    loading: bool,
    loaded_once: bool,
    error: Option<String>,

    /// Fetch guards (ignore stale responses).
    issued_seq: u64,
    applied_seq: u64,
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once any fetch has resolved successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded_once
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.rebuild();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.visible = derive_view(&self.products, &self.filter, self.sort);
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued_seq = self.issued_seq.saturating_add(1);
        self.loading = true;
        RefreshTicket(self.issued_seq)
    }

    /// Applies a fetch result unless a newer one was already applied.
    ///
    /// Returns whether the result was applied.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: ApiResult<Vec<Product>>,
    ) -> bool {
        if ticket.0 == self.issued_seq {
            self.loading = false;
        }

        if ticket.0 <= self.applied_seq {
            leptos::logging::log!(
                "discarding stale catalog response #{} (applied #{})",
                ticket.0,
                self.applied_seq
            );
            return false;
        }
        self.applied_seq = ticket.0;

        match result {
            Ok(products) => {
                self.products = products;
                self.loaded_once = true;
                self.error = None;
                self.rebuild();
            }
            Err(e) => {
                leptos::logging::warn!("catalog refresh failed: {e}");
                self.error = Some(user_message(&e, CatalogOp::Load));
            }
        }
        true
    }

    pub async fn refresh<R: ProductRemote>(&mut self, remote: &R) -> bool {
        let ticket = self.begin_refresh();
        let result = remote.list_products().await;
        self.finish_refresh(ticket, result)
    }

    /// Records a failed delete; the collection is left as it was.
    pub fn delete_failed(&mut self, err: &ApiError) {
        leptos::logging::warn!("delete failed: {err}");
        self.error = Some(user_message(err, CatalogOp::Delete));
    }

    /// Deletes remotely, then re-fetches. No optimistic local removal.
    pub async fn delete_one<R: ProductRemote>(&mut self, remote: &R, id: i64) -> ApiResult<()> {
        if let Err(e) = remote.delete_product(id).await {
            self.delete_failed(&e);
            return Err(e);
        }
        self.refresh(remote).await;
        Ok(())
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Empties the view for a new session.
    ///
    /// Tickets issued before the reset stay stale, so a fetch still in flight
    /// from the previous session is discarded when it resolves.
    pub fn reset(&mut self) {
        let issued_seq = self.issued_seq;
        *self = Self {
            issued_seq,
            applied_seq: issued_seq,
            ..Self::default()
        };
    }
}
