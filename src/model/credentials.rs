use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer credential. Expiry is server-side only and discovered lazily.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Returns `None` for an empty string; an empty token is never valid.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Access/refresh pair. Valid only when both halves are present or both are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialPair {
    pub access: Option<Token>,
    pub refresh: Option<Token>,
}

impl CredentialPair {
    pub fn new(access: Token, refresh: Token) -> Self {
        Self {
            access: Some(access),
            refresh: Some(refresh),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.access.is_some() && self.refresh.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }

    /// Mixed pairs are never persisted and never observed by readers.
    pub fn is_consistent(&self) -> bool {
        self.is_present() || self.is_empty()
    }

    /// Builds a pair from the raw persisted entries, collapsing any mixed
    /// state to empty.
    pub(crate) fn from_entries(access: Option<String>, refresh: Option<String>) -> Self {
        let access = access.and_then(Token::new);
        let refresh = refresh.and_then(Token::new);
        match (access, refresh) {
            (Some(a), Some(r)) => Self::new(a, r),
            _ => Self::empty(),
        }
    }
}
