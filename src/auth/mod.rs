use crate::storage::{BrowserStorage, KeyValueStore, TOKEN_KEY, USER_KEY};
use crate::util::now_secs;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use std::sync::Arc;

/// Bearer token plus the account it was issued to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub username: String,
}

/// Persistent login state, shared by every `ApiClient` built over the same storage.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Backed by `window.localStorage`.
    pub fn browser() -> Self {
        Self::new(Arc::new(BrowserStorage))
    }

    pub fn set(&self, token: &str, username: &str) {
        self.storage.set_item(TOKEN_KEY, token);
        self.storage.set_item(USER_KEY, username);
    }

    /// Both halves must be present.
    pub fn get(&self) -> Option<Credential> {
        let token = self.storage.get_item(TOKEN_KEY)?;
        let username = self.storage.get_item(USER_KEY)?;
        Some(Credential { token, username })
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get_item(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn username(&self) -> Option<String> {
        self.storage.get_item(USER_KEY)
    }

    pub fn clear(&self) {
        self.storage.remove_item(TOKEN_KEY);
        self.storage.remove_item(USER_KEY);
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_secs())
    }

    /// Token present and not expired at `now_secs`.
    ///
    /// An expired token is cleared. A token whose expiry cannot be read is
    /// reported invalid but left in place.
    pub fn is_valid_at(&self, now_secs: f64) -> bool {
        let Some(token) = self.token() else {
            return false;
        };

        let Some(exp) = token_expiry(&token) else {
            leptos::logging::warn!("stored token has no readable expiry");
            return false;
        };

        if exp < now_secs {
            leptos::logging::log!("stored token expired, clearing credentials");
            self.clear();
            return false;
        }

        true
    }
}

/// `exp` claim (seconds since epoch) of a `header.payload.signature` token.
pub fn token_expiry(token: &str) -> Option<f64> {
    let mut parts = token.trim().split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;

    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    fn store() -> (CredentialStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (CredentialStore::new(Arc::new(storage.clone())), storage)
    }

    #[test]
    fn test_set_get_clear() {
        let (creds, storage) = store();
        assert!(creds.get().is_none());

        creds.set("abc", "admin");
        assert_eq!(
            creds.get(),
            Some(Credential {
                token: "abc".to_string(),
                username: "admin".to_string(),
            })
        );
        assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("abc"));

        creds.clear();
        assert!(creds.get().is_none());
        assert!(creds.token().is_none());
        assert!(storage.get_item(USER_KEY).is_none());
    }

    #[test]
    fn test_get_requires_username() {
        let (creds, storage) = store();
        storage.set_item(TOKEN_KEY, "abc");
        assert!(creds.get().is_none());
        assert_eq!(creds.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_token_expiry_reads_exp_claim() {
        let token = token_with_payload(r#"{"sub":"admin","exp":1700000000}"#);
        assert_eq!(token_expiry(&token), Some(1_700_000_000.0));
    }

    #[test]
    fn test_token_expiry_rejects_malformed() {
        assert_eq!(token_expiry("not-a-jwt"), None);
        assert_eq!(token_expiry("a.b"), None);
        assert_eq!(token_expiry("a.b.c.d"), None);
        assert_eq!(token_expiry("a.%%%.c"), None);
        assert_eq!(token_expiry(&token_with_payload("not json")), None);
        assert_eq!(token_expiry(&token_with_payload(r#"{"sub":"x"}"#)), None);
        assert_eq!(token_expiry(&token_with_payload(r#"{"exp":"soon"}"#)), None);
    }

    #[test]
    fn test_token_expiry_accepts_padded_standard_alphabet() {
        let payload = STANDARD_NO_PAD.encode(r#"{"exp":42}"#);
        let token = format!("h.{payload}==.s");
        assert_eq!(token_expiry(&token), Some(42.0));
    }

    #[test]
    fn test_is_valid_without_token() {
        let (creds, _) = store();
        assert!(!creds.is_valid_at(0.0));
    }

    #[test]
    fn test_is_valid_with_future_expiry() {
        let (creds, _) = store();
        creds.set(&token_with_payload(r#"{"exp":2000}"#), "admin");
        assert!(creds.is_valid_at(1000.0));
        assert!(creds.get().is_some());
    }

    #[test]
    fn test_is_valid_against_the_current_clock() {
        let (creds, _) = store();
        let exp = now_secs() + 3600.0;
        creds.set(&token_with_payload(&format!(r#"{{"exp":{exp}}}"#)), "admin");
        assert!(creds.is_valid());

        creds.clear();
        assert!(!creds.is_valid());
        assert!(creds.get().is_none());
    }

    #[test]
    fn test_expired_token_is_cleared() {
        let (creds, _) = store();
        creds.set(&token_with_payload(r#"{"exp":1000}"#), "admin");
        assert!(!creds.is_valid_at(2000.0));
        assert!(creds.get().is_none());
        assert!(creds.token().is_none());
    }

    #[test]
    fn test_undecodable_token_fails_closed_without_clearing() {
        let (creds, _) = store();
        creds.set("opaque-token", "admin");
        assert!(!creds.is_valid_at(0.0));
        assert_eq!(creds.token().as_deref(), Some("opaque-token"));
    }

    #[test]
    fn test_blank_token_counts_as_absent() {
        let (creds, _) = store();
        creds.set("   ", "admin");
        assert!(creds.token().is_none());
        assert!(!creds.is_valid_at(0.0));
    }
}
