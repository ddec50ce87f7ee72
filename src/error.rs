//! Error types for the session and authorization core.

use std::collections::BTreeMap;

/// Credential store failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// A write carried only one half of the pair.
    #[error("invalid credential pair: access and refresh tokens must both be present")]
    InvalidCredentialPair,

    /// The durable medium could not be written.
    #[error("persist credentials to {path}: {message}")]
    Persist { path: String, message: String },
}

/// Renewal outcome shared by every caller waiting on the same attempt.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenewalError {
    #[error("no refresh token available")]
    NoRefreshToken,

    #[error("token renewal failed: {0}")]
    Failed(String),
}

/// Outcome of a call through the request gateway.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Non-success status other than a recoverable 401.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Authorization failed and could not be recovered by renewal.
    #[error("session expired")]
    SessionExpired,

    /// Transport failure: timeout, DNS, connection refused.
    #[error("network error: {0}")]
    Network(String),

    /// Success status with a body that could not be decoded.
    #[error("decode response: {0}")]
    Decode(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Per-field validation messages from a 400 body.
    ///
    /// Accepts both `{"errors": {"email": ["..."]}}` and the bare
    /// `{"email": ["..."]}` form. Returns an empty map for anything else.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Self::Status { status: 400, body } = self else {
            return BTreeMap::new();
        };
        let Ok(v) = serde_json::from_str::<serde_json::Value>(body) else {
            return BTreeMap::new();
        };
        let obj = match v.get("errors").and_then(|e| e.as_object()) {
            Some(errors) => errors,
            None => match v.as_object() {
                Some(obj) => obj,
                None => return BTreeMap::new(),
            },
        };

        let mut out = BTreeMap::new();
        for (field, msgs) in obj {
            let msgs: Vec<String> = match msgs {
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect(),
                serde_json::Value::String(s) => vec![s.clone()],
                _ => Vec::new(),
            };
            if !msgs.is_empty() {
                out.insert(field.clone(), msgs);
            }
        }
        out
    }
}

/// Login failures. A failed login never leaves credentials behind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("network error: {0}")]
    Network(String),

    /// Any other server or decoding failure during login or the profile fetch.
    #[error("login failed: {0}")]
    Unexpected(String),
}

/// Capability check failure for route-guard style callers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("permission denied: requires {code}")]
pub struct Denied {
    pub code: String,
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
