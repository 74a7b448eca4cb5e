/// Sign-in form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginDraft {
    pub username: String,
    pub password: String,
}

impl LoginDraft {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The first problem with the inputs, if any. The password is not trimmed.
    pub fn validate(&self) -> Option<&'static str> {
        if self.username.trim().is_empty() {
            return Some("Username is required");
        }
        if self.password.is_empty() {
            return Some("Password is required");
        }
        None
    }

    pub fn username(&self) -> &str {
        self.username.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_draft_requires_both_fields() {
        assert_eq!(
            LoginDraft::new("  ", "pw").validate(),
            Some("Username is required")
        );
        assert_eq!(
            LoginDraft::new("admin", "").validate(),
            Some("Password is required")
        );
        assert_eq!(LoginDraft::new(" admin ", " ").validate(), None);
        assert_eq!(LoginDraft::new(" admin ", "x").username(), "admin");
    }
}
