//! Auth Policy Evaluator
//!
//! Pure decision function applied before a widget runs. A widget's own
//! requirement overrides the server default; scopes are only checked when
//! the widget declares some and a token is present.

use std::collections::BTreeSet;

/// Inputs to [`evaluate`].
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    /// Requirement pinned by the widget, `None` to defer to the server.
    pub widget_requires_auth: Option<bool>,
    pub server_requires_auth: bool,
    /// Scopes of the presented token, `None` when no token was presented.
    pub token_scopes: Option<&'a [String]>,
    pub required_scopes: &'a [String],
}

/// Why a call was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDenial {
    AuthenticationRequired,
    /// Required scopes absent from the token, sorted.
    MissingScopes(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny(AuthDenial),
}

/// Resolves the tri-state widget requirement against the server default.
pub fn effective_requires_auth(widget_requires_auth: Option<bool>, server_requires_auth: bool) -> bool {
    widget_requires_auth.unwrap_or(server_requires_auth)
}

/// Decides whether a call may proceed.
///
/// An authenticated caller satisfies a widget with an empty scope set, even
/// when the server advertises default scopes.
pub fn evaluate(request: AuthRequest<'_>) -> AuthDecision {
    let requires_auth =
        effective_requires_auth(request.widget_requires_auth, request.server_requires_auth);

    let Some(granted) = request.token_scopes else {
        return if requires_auth {
            AuthDecision::Deny(AuthDenial::AuthenticationRequired)
        } else {
            AuthDecision::Allow
        };
    };

    if request.required_scopes.is_empty() {
        return AuthDecision::Allow;
    }

    let granted: BTreeSet<&str> = granted.iter().map(String::as_str).collect();
    let missing: Vec<String> = request
        .required_scopes
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .difference(&granted)
        .map(|scope| scope.to_string())
        .collect();

    if missing.is_empty() {
        AuthDecision::Allow
    } else {
        AuthDecision::Deny(AuthDenial::MissingScopes(missing))
    }
}
