use super::{ApiError, ApiErrorKind, ApiResult, ProductRemote};
use crate::models::Product;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    List,
    Get(i64),
    Create(Product),
    Update(i64, Product),
    Delete(i64),
}

/// In-memory catalog that records every call.
#[derive(Default)]
pub(crate) struct FakeRemote {
    pub products: RefCell<Vec<Product>>,
    pub calls: RefCell<Vec<Call>>,
    /// Returned (front first) instead of performing the next call.
    pub failures: RefCell<VecDeque<ApiError>>,
    next_id: RefCell<i64>,
}

impl FakeRemote {
    pub fn with_products(products: Vec<Product>) -> Self {
        let next_id = products.iter().filter_map(|p| p.id).max().unwrap_or(0);
        Self {
            products: RefCell::new(products),
            next_id: RefCell::new(next_id),
            ..Default::default()
        }
    }

    pub fn fail_next(&self, kind: ApiErrorKind, status: Option<u16>) {
        self.failures.borrow_mut().push_back(ApiError {
            kind,
            status,
            message: "injected".to_string(),
        });
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        match self.failures.borrow_mut().pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, "Product not found")
    }
}

pub(crate) fn product(id: Option<i64>, name: &str, price: f64, quantity: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: String::new(),
        price,
        quantity,
        category: None,
        image_base64: None,
        image_type: None,
    }
}

impl ProductRemote for FakeRemote {
    async fn list_products(&self) -> ApiResult<Vec<Product>> {
        self.record(Call::List)?;
        Ok(self.products.borrow().clone())
    }

    async fn get_product(&self, id: i64) -> ApiResult<Product> {
        self.record(Call::Get(id))?;
        self.products
            .borrow()
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_product(&self, product: &Product) -> ApiResult<Product> {
        self.record(Call::Create(product.clone()))?;
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            *next
        };
        let saved = Product {
            id: Some(id),
            ..product.clone()
        };
        self.products.borrow_mut().push(saved.clone());
        Ok(saved)
    }

    async fn update_product(&self, id: i64, product: &Product) -> ApiResult<Product> {
        self.record(Call::Update(id, product.clone()))?;
        let mut products = self.products.borrow_mut();
        let slot = products
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(Self::not_found)?;
        *slot = Product {
            id: Some(id),
            ..product.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: i64) -> ApiResult<()> {
        self.record(Call::Delete(id))?;
        let mut products = self.products.borrow_mut();
        let before = products.len();
        products.retain(|p| p.id != Some(id));
        if products.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}
