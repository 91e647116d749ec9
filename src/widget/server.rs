//! Widget Server
//!
//! Composition root shared by every protocol handler: the widget registry,
//! the server-wide auth policy and the process-wide locale hint.

use std::sync::{PoisonError, RwLock};

use super::registry::WidgetRegistry;

/// Server-wide authentication defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerPolicy {
    /// Applied to widgets that do not pin their own requirement.
    pub requires_auth: bool,

    /// Scopes advertised on tools when the server requires auth.
    pub auth_scopes: Vec<String>,
}

/// Owns the registry and the policy state handlers read on every request.
#[derive(Default)]
pub struct WidgetServer {
    registry: WidgetRegistry,
    policy: ServerPolicy,
    client_locale: RwLock<Option<String>>,
}

impl WidgetServer {
    pub fn new(policy: ServerPolicy) -> Self {
        Self {
            registry: WidgetRegistry::new(),
            policy,
            client_locale: RwLock::new(None),
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &ServerPolicy {
        &self.policy
    }

    /// Last locale requested during initialize. A hint only: per-call
    /// negotiation takes precedence.
    pub fn client_locale(&self) -> Option<String> {
        self.client_locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_client_locale(&self, locale: impl Into<String>) {
        *self
            .client_locale
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(locale.into());
    }
}
