/// Supplies the identity used for remote requests.
pub trait AuthProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;

    /// Username the token belongs to, when known.
    fn username(&self) -> Option<String>;

    fn is_authorized(&self) -> bool {
        self.access_token().is_some()
    }
}

/// Personal access token, as issued in the Discogs developer settings.
#[derive(Debug, Clone, Default)]
pub struct TokenAuth {
    token: Option<String>,
    username: Option<String>,
}

impl TokenAuth {
    pub fn new(token: Option<String>, username: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            username: username.filter(|u| !u.trim().is_empty()),
        }
    }
}

impl AuthProvider for TokenAuth {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn username(&self) -> Option<String> {
        self.username.clone()
    }
}
