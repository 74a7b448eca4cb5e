#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use catalog_admin::api::ApiClient;
use catalog_admin::auth::CredentialStore;
use catalog_admin::models::Product;
use catalog_admin::storage::MemoryStorage;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    next_id: i64,
    /// `Authorization` header of every catalog request, in arrival order.
    pub auth_headers: Vec<Option<String>>,
    /// Answered instead of the next catalog request.
    pub fail_next: Option<(StatusCode, String)>,
}

#[derive(Clone, Default)]
pub struct FakeServer {
    pub catalog: Arc<Mutex<Catalog>>,
}

pub struct ServerGuard {
    pub base_url: String,
    pub server: FakeServer,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl ServerGuard {
    /// A client with its own in-memory credential store.
    pub fn client(&self) -> (ApiClient, MemoryStorage) {
        let storage = MemoryStorage::new();
        let client = ApiClient::new(
            &format!("{}/", self.base_url),
            CredentialStore::new(Arc::new(storage.clone())),
        );
        (client, storage)
    }

    pub fn seed(&self, name: &str, price: f64, quantity: i64) -> i64 {
        let mut c = self.server.catalog.lock().expect("catalog lock");
        c.next_id += 1;
        let id = c.next_id;
        c.products.push(Product {
            id: Some(id),
            name: name.to_string(),
            description: String::new(),
            price,
            quantity,
            category: None,
            image_base64: None,
            image_type: None,
        });
        id
    }

    pub fn fail_next(&self, status: StatusCode, body: &str) {
        self.server.catalog.lock().expect("catalog lock").fail_next =
            Some((status, body.to_string()));
    }

    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.server.catalog.lock().expect("catalog lock").auth_headers.clone()
    }

    pub fn product_names(&self) -> Vec<String> {
        let c = self.server.catalog.lock().expect("catalog lock");
        c.products.iter().map(|p| p.name.clone()).collect()
    }
}

pub fn issued_token() -> String {
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{USERNAME}","exp":4102444800}}"#))
    )
}

pub async fn spawn_server() -> Result<ServerGuard> {
    let server = FakeServer::default();

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/products", get(list).post(create))
        .route("/api/products/:id", get(fetch).put(update).delete(remove))
        .with_state(server.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind fake catalog server")?;
    let addr: SocketAddr = listener.local_addr().context("read listener local addr")?;

    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(ServerGuard {
        base_url: format!("http://{addr}"),
        server,
        task,
    })
}

/// An address nothing listens on.
pub async fn closed_url() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn login(Json(body): Json<serde_json::Value>) -> Response {
    let username = body.get("username").and_then(|v| v.as_str()).unwrap_or_default();
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or_default();

    if username != USERNAME || password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }

    Json(serde_json::json!({
        "token": issued_token(),
        "username": USERNAME,
        "userType": "ADMIN",
    }))
    .into_response()
}

/// Records the request's `Authorization` header and takes any injected failure.
fn admit(server: &FakeServer, headers: &HeaderMap) -> Result<(), Response> {
    let mut c = server.catalog.lock().expect("catalog lock");
    c.auth_headers.push(
        headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    match c.fail_next.take() {
        Some((status, body)) => Err((status, body).into_response()),
        None => Ok(()),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Product not found").into_response()
}

async fn list(State(server): State<FakeServer>, headers: HeaderMap) -> Response {
    if let Err(r) = admit(&server, &headers) {
        return r;
    }
    let c = server.catalog.lock().expect("catalog lock");
    Json(c.products.clone()).into_response()
}

async fn fetch(
    State(server): State<FakeServer>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = admit(&server, &headers) {
        return r;
    }
    let c = server.catalog.lock().expect("catalog lock");
    match c.products.iter().find(|p| p.id == Some(id)) {
        Some(p) => Json(p.clone()).into_response(),
        None => not_found(),
    }
}

async fn create(
    State(server): State<FakeServer>,
    headers: HeaderMap,
    Json(mut product): Json<Product>,
) -> Response {
    if let Err(r) = admit(&server, &headers) {
        return r;
    }
    let mut c = server.catalog.lock().expect("catalog lock");
    c.next_id += 1;
    product.id = Some(c.next_id);
    c.products.push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update(
    State(server): State<FakeServer>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(mut product): Json<Product>,
) -> Response {
    if let Err(r) = admit(&server, &headers) {
        return r;
    }
    let mut c = server.catalog.lock().expect("catalog lock");
    let Some(slot) = c.products.iter_mut().find(|p| p.id == Some(id)) else {
        return not_found();
    };
    product.id = Some(id);
    *slot = product.clone();
    Json(product).into_response()
}

async fn remove(
    State(server): State<FakeServer>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = admit(&server, &headers) {
        return r;
    }
    let mut c = server.catalog.lock().expect("catalog lock");
    let before = c.products.len();
    c.products.retain(|p| p.id != Some(id));
    if c.products.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}
