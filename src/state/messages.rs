use crate::api::{ApiError, ApiErrorKind};

/// What the user was doing when a request failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogOp {
    Load,
    LoadOne,
    Create,
    Update,
    Delete,
    Login,
}

impl CatalogOp {
    fn verb(self) -> &'static str {
        match self {
            CatalogOp::Load | CatalogOp::LoadOne => "view",
            CatalogOp::Create => "create",
            CatalogOp::Update => "update",
            CatalogOp::Delete => "delete",
            CatalogOp::Login => "sign in to",
        }
    }
}

const INVALID_LOGIN: &str = "Invalid username or password. Please try again.";
const NETWORK: &str =
    "Network error. Please check your connection and ensure the backend server is running.";

/// User-facing text for a failed request.
pub fn user_message(err: &ApiError, op: CatalogOp) -> String {
    match (err.kind, op) {
        (ApiErrorKind::Network, _) => NETWORK.to_string(),
        (ApiErrorKind::Server, _) => "Server error. Please try again later.".to_string(),
        (_, CatalogOp::Login) => INVALID_LOGIN.to_string(),
        (ApiErrorKind::Unauthorized, _) => {
            "Authentication required. Please login again.".to_string()
        }
        (ApiErrorKind::Forbidden, _) => format!(
            "Access forbidden. You do not have permission to {} products.",
            op.verb()
        ),
        (ApiErrorKind::NotFound, _) => "Product not found.".to_string(),
        (_, CatalogOp::Load) => {
            let detail = if err.message.trim().is_empty() {
                "Unknown error"
            } else {
                err.message.trim()
            };
            format!("Failed to fetch products: {detail}.")
        }
        (_, CatalogOp::LoadOne) => "Failed to load product for editing.".to_string(),
        (_, op) => {
            let detail = err.message.trim();
            if detail.is_empty() {
                format!("Failed to {} product. Please try again.", op.verb())
            } else {
                format!("Failed to {} product: {detail}. Please try again.", op.verb())
            }
        }
    }
}
