use crate::auth::CredentialStore;
use crate::models::Product;
use serde::{Deserialize, Serialize};

#[cfg(test)]
pub(crate) mod fake;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: the session is missing or no longer accepted.
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 5xx
    Server,
    /// Any other non-2xx status.
    Http,
    /// No response was received.
    Network,
    /// 2xx with a body that does not decode.
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: e.to_string(),
        }
    }

    /// Classify a non-2xx response. `body` becomes the message when it has text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Http,
        };

        let body = body.trim();
        let message = if body.is_empty() {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"))
        } else {
            body.to_string()
        };

        Self {
            kind,
            status: Some(status),
            message,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    /// Reads `window.ENV.API_URL` (or legacy `window.ENV.api_url`) injected by the host page.
    pub fn new() -> Self {
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub username: String,
    /// "admin" or "user".
    #[serde(rename = "userType", default)]
    pub user_type: Option<String>,
}

/// Catalog operations the view and form state machines depend on.
#[allow(async_fn_in_trait)]
pub trait ProductRemote {
    async fn list_products(&self) -> ApiResult<Vec<Product>>;
    async fn get_product(&self, id: i64) -> ApiResult<Product>;
    async fn create_product(&self, product: &Product) -> ApiResult<Product>;
    async fn update_product(&self, id: i64, product: &Product) -> ApiResult<Product>;
    async fn delete_product(&self, id: i64) -> ApiResult<()>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    auth_base: String,
    catalog_base: String,
    credentials: CredentialStore,
}

impl ApiClient {
    pub fn new(api_url: &str, credentials: CredentialStore) -> Self {
        let api_url = api_url.trim_end_matches('/');
        Self {
            auth_base: format!("{api_url}/api/auth"),
            catalog_base: format!("{api_url}/api/products"),
            credentials,
        }
    }

    /// Browser configuration: `window.ENV` for the URL, localStorage for credentials.
    pub fn from_env() -> Self {
        Self::new(&EnvConfig::new().api_url, CredentialStore::browser())
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_valid()
    }

    pub fn logout(&self) {
        self.credentials.clear();
    }

    pub(crate) fn auth_header(&self) -> Option<String> {
        self.credentials
            .token()
            .map(|t| format!("Bearer {}", t.trim()))
    }

    /// Exchanges a username/password for a bearer token and stores it.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let url = format!("{}/login", self.auth_base);
        let res = reqwest::Client::new()
            .post(url)
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(ApiError::network)?;

        let res = Self::check_status(res, "POST", "/login").await?;
        let mut body: LoginResponse = res.json().await.map_err(ApiError::parse)?;

        if body.username.trim().is_empty() {
            body.username = username.to_string();
        }
        self.credentials.set(&body.token, &body.username);

        Ok(body)
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Product>,
    ) -> ApiResult<reqwest::Response> {
        let url = format!("{}{}", self.catalog_base, path);
        let mut req = reqwest::Client::new().request(method.clone(), url);
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(|e| {
            leptos::logging::warn!("{method} {path}: no response ({e})");
            ApiError::network(e)
        })?;

        Self::check_status(res, method.as_str(), path).await
    }

    async fn check_status(
        res: reqwest::Response,
        method: &str,
        path: &str,
    ) -> ApiResult<reqwest::Response> {
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        leptos::logging::warn!("{method} {path} failed ({status})");
        Err(ApiError::from_status(status, &body))
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Product>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json().await.map_err(ApiError::parse)
    }
}

impl ProductRemote for ApiClient {
    async fn list_products(&self) -> ApiResult<Vec<Product>> {
        self.request_json(reqwest::Method::GET, "", None).await
    }

    async fn get_product(&self, id: i64) -> ApiResult<Product> {
        self.request_json(reqwest::Method::GET, &format!("/{id}"), None)
            .await
    }

    async fn create_product(&self, product: &Product) -> ApiResult<Product> {
        self.request_json(reqwest::Method::POST, "", Some(product))
            .await
    }

    async fn update_product(&self, id: i64, product: &Product) -> ApiResult<Product> {
        self.request_json(reqwest::Method::PUT, &format!("/{id}"), Some(product))
            .await
    }

    async fn delete_product(&self, id: i64) -> ApiResult<()> {
        // 200 or 204; the body (if any) is not part of the contract.
        self.send(reqwest::Method::DELETE, &format!("/{id}"), None)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use std::sync::Arc;

    fn client() -> ApiClient {
        ApiClient::new(
            "http://localhost:8080/",
            CredentialStore::new(Arc::new(MemoryStorage::new())),
        )
    }

    #[test]
    fn test_is_authenticated_until_logout() {
        let client = client();
        assert!(!client.is_authenticated());

        let exp = crate::util::now_secs() + 3600.0;
        let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"admin","exp":{exp}}}"#));
        client
            .credentials()
            .set(&format!("eyJhbGciOiJIUzI1NiJ9.{claims}.c2lnbmF0dXJl"), "admin");
        assert!(client.is_authenticated());

        client.logout();
        assert!(!client.is_authenticated());
        assert!(client.credentials().token().is_none());
    }

    #[test]
    fn test_login_response_contract_deserialize() {
        // Contract based on the backend's AuthResponse.
        let json = r#"{"token": "jwt-token", "username": "admin", "userType": "admin"}"#;
        let parsed: LoginResponse =
            serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.token, "jwt-token");
        assert_eq!(parsed.username, "admin");
        assert_eq!(parsed.user_type.as_deref(), Some("admin"));
    }

    #[test]
    fn test_login_response_without_user_type() {
        let parsed: LoginResponse =
            serde_json::from_str(r#"{"token": "t"}"#).expect("should parse");
        assert!(parsed.username.is_empty());
        assert!(parsed.user_type.is_none());
    }

    #[test]
    fn test_api_client_bases_trim_trailing_slash() {
        let c = client();
        assert_eq!(c.auth_base, "http://localhost:8080/api/auth");
        assert_eq!(c.catalog_base, "http://localhost:8080/api/products");
    }

    #[test]
    fn test_auth_header_without_token() {
        assert!(client().auth_header().is_none());
    }

    #[test]
    fn test_auth_header_with_token_is_trimmed() {
        let c = client();
        c.credentials().set(" my-jwt-token\n", "admin");
        assert_eq!(c.auth_header().as_deref(), Some("Bearer my-jwt-token"));
    }

    #[test]
    fn test_logout_drops_auth_header() {
        let c = client();
        c.credentials().set("my-jwt-token", "admin");
        c.logout();
        assert!(c.auth_header().is_none());
        assert!(c.credentials().get().is_none());
    }

    #[test]
    fn test_clones_share_credentials() {
        let a = client();
        let b = a.clone();
        a.credentials().set("t", "u");
        assert_eq!(b.auth_header().as_deref(), Some("Bearer t"));
    }

    #[test]
    fn test_error_kind_from_status() {
        assert_eq!(ApiError::from_status(401, "").kind, ApiErrorKind::Unauthorized);
        assert_eq!(ApiError::from_status(403, "").kind, ApiErrorKind::Forbidden);
        assert_eq!(ApiError::from_status(404, "").kind, ApiErrorKind::NotFound);
        assert_eq!(ApiError::from_status(500, "").kind, ApiErrorKind::Server);
        assert_eq!(ApiError::from_status(503, "").kind, ApiErrorKind::Server);
        assert_eq!(ApiError::from_status(400, "").kind, ApiErrorKind::Http);
        assert_eq!(ApiError::from_status(409, "").status, Some(409));
    }

    #[test]
    fn test_error_message_prefers_body() {
        let e = ApiError::from_status(400, "  name must not be blank \n");
        assert_eq!(e.message, "name must not be blank");
        assert_eq!(e.to_string(), "name must not be blank");

        let e = ApiError::from_status(404, "");
        assert_eq!(e.message, "Not Found");
    }
}
