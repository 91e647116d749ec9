//! Access Tokens
//!
//! Bearer tokens presented by the host, and the verifier seam that turns a
//! raw token string into an [`AccessToken`] with scopes.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A verified (or opaque) credential attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Raw token string.
    pub token: String,

    /// Principal the token was issued to, when the verifier knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Scopes granted to the token.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl AccessToken {
    /// A token nothing vouches for: it authenticates the caller but grants no scopes.
    pub fn opaque(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            subject: None,
            scopes: Vec::new(),
        }
    }

    pub fn with_scopes<I, S>(token: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            token: token.into(),
            subject: None,
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads the `access_token` entry of request metadata.
    ///
    /// Metadata is client supplied, so any scopes it claims are ignored: a
    /// string or `{ "token": ... }` object yields an opaque token.
    pub fn from_meta(value: &Value) -> Option<Self> {
        let raw = match value {
            Value::String(token) => token.as_str(),
            Value::Object(map) => map.get("token").and_then(Value::as_str)?,
            _ => return None,
        };
        (!raw.is_empty()).then(|| Self::opaque(raw))
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Turns a raw bearer token into an [`AccessToken`].
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns `None` when the token is not recognised.
    async fn verify(&self, token: &str) -> Option<AccessToken>;
}

/// Verifier backed by a fixed table of tokens and their scopes.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Vec<String>>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, Vec<String>>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Option<AccessToken> {
        let scopes = self.tokens.get(token)?;
        Some(AccessToken::with_scopes(token, scopes.iter().cloned()))
    }
}
