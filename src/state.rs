//! Application State
//!
//! Everything the HTTP layer shares between requests: the widget server,
//! the handler bindings built from it, and the token verifier.

use std::sync::Arc;

use crate::{
    auth::TokenVerifier,
    mcp::{HandlerRegistry, McpAppsAdapter, ProtocolAdapter},
    widget::WidgetServer,
};

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
pub struct AppState {
    pub server: Arc<WidgetServer>,

    /// Request-type to handler bindings the transport dispatches through.
    pub handlers: HandlerRegistry,

    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Installs the MCP Apps adapter on top of the host's default handlers.
    pub fn new(
        server: Arc<WidgetServer>,
        verifier: Arc<dyn TokenVerifier>,
        advertise_ui_extension: bool,
    ) -> Self {
        Self::with_host_handlers(
            server,
            verifier,
            HandlerRegistry::with_host_defaults(),
            advertise_ui_extension,
        )
    }

    /// Installs the MCP Apps adapter on top of an existing set of host
    /// handlers, chaining to the host's initialize handler if it has one.
    pub fn with_host_handlers(
        server: Arc<WidgetServer>,
        verifier: Arc<dyn TokenVerifier>,
        mut handlers: HandlerRegistry,
        advertise_ui_extension: bool,
    ) -> Self {
        McpAppsAdapter::new(Arc::clone(&server), advertise_ui_extension)
            .register_handlers(&mut handlers);
        Self {
            server,
            handlers,
            verifier,
        }
    }
}
