//! Authenticated session value

use std::fmt;

/// Opaque bearer credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Zero or one bearer token plus the user it was issued for.
///
/// Lifecycle:
///   ABSENT -> ACTIVE (establish, on successful login)
///   ACTIVE -> ABSENT (clear, on 401 or logout)
///   ACTIVE -> ACTIVE (establish, a new login replaces the token)
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<AccessToken>,
    username: Option<String>,
}

impl Session {
    /// Create an unauthenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a freshly issued token, replacing any previous one
    pub fn establish(&mut self, token: AccessToken, username: impl Into<String>) {
        self.token = Some(token);
        self.username = Some(username.into());
    }

    /// Drop the token
    pub fn clear(&mut self) {
        self.token = None;
        self.username = None;
    }

    /// Drop the token only if it is still `token`.
    /// Returns whether anything was cleared.
    pub fn clear_if_current(&mut self, token: &AccessToken) -> bool {
        if self.token.as_ref() == Some(token) {
            self.clear();
            true
        } else {
            false
        }
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }
}
