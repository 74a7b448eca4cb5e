use crate::models::Product;

pub const LOW_STOCK_THRESHOLD: i64 = 10;
pub const RECENT_LIMIT: usize = 5;

/// Dashboard figures derived from the fetched catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogStats {
    pub total_products: usize,
    pub total_value: f64,
    pub low_stock: usize,
    /// Newest first. The server returns products in creation order.
    pub recent: Vec<Product>,
}

pub fn summarize(products: &[Product]) -> CatalogStats {
    CatalogStats {
        total_products: products.len(),
        total_value: products.iter().map(Product::stock_value).sum(),
        low_stock: products
            .iter()
            .filter(|p| p.quantity < LOW_STOCK_THRESHOLD)
            .count(),
        recent: products.iter().rev().take(RECENT_LIMIT).cloned().collect(),
    }
}
