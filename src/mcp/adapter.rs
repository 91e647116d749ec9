//! MCP Apps Protocol Adapter
//!
//! Wires the widget server onto a [`HandlerRegistry`] for the MCP Apps
//! extension (`ui://` resources served as `text/html+mcp`). Every handler
//! re-reads the registry on each request and always answers with a
//! well-formed result: tool failures become `isError` results, unknown
//! resources become an empty read with an error annotation.

use std::{panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use futures_util::FutureExt;
use serde_json::{json, Map, Value};

use super::{
    dispatch::{to_result_value, HandlerRegistry, McpRequest, RequestContext, RequestHandler, RequestKind, RpcError},
    locale::{negotiate_for, renegotiate_all, requested_locale},
    meta::{build_tool, build_ui_meta, build_ui_resource},
    models::*,
};
use crate::{
    auth::{evaluate, AccessToken, AuthDecision, AuthDenial, AuthRequest},
    widget::{ClientContext, UserContext, WidgetDescriptor, WidgetError, WidgetServer},
};

/// Seam for protocol variants: each adapter installs its own handlers.
pub trait ProtocolAdapter {
    fn register_handlers(&self, registry: &mut HandlerRegistry);
}

/// Why a tool call produced an error result.
#[derive(Debug, thiserror::Error)]
pub enum CallToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Authentication required for this tool")]
    AuthenticationRequired,

    #[error("Missing required scopes: {}", .0.join(", "))]
    MissingScopes(Vec<String>),

    #[error("Error: {0}")]
    Validation(String),

    #[error("Error: {0}")]
    Execution(String),
}

impl From<AuthDenial> for CallToolError {
    fn from(denial: AuthDenial) -> Self {
        match denial {
            AuthDenial::AuthenticationRequired => Self::AuthenticationRequired,
            AuthDenial::MissingScopes(missing) => Self::MissingScopes(missing),
        }
    }
}

/// Adapter for the MCP Apps extension.
#[derive(Clone)]
pub struct McpAppsAdapter {
    server: Arc<WidgetServer>,
    advertise_ui_extension: bool,
}

impl McpAppsAdapter {
    /// `advertise_ui_extension` controls whether a synthesized initialize
    /// result lists the UI extension under `capabilities.extensions`.
    pub fn new(server: Arc<WidgetServer>, advertise_ui_extension: bool) -> Self {
        Self {
            server,
            advertise_ui_extension,
        }
    }

    pub fn server(&self) -> &WidgetServer {
        &self.server
    }

    // =========================================================================
    // initialize
    // =========================================================================

    /// Applies locale bookkeeping, then defers to `previous` when the host
    /// had its own initialize handler.
    pub async fn initialize(
        &self,
        request: McpRequest,
        previous: Option<&dyn RequestHandler>,
    ) -> Result<Value, RpcError> {
        // Only `_meta` is read before delegating; the host handler judges
        // the rest of the params on its own terms.
        let requested = request
            .params
            .get("_meta")
            .and_then(Value::as_object)
            .and_then(requested_locale);
        if let Some(locale) = requested {
            let updated = renegotiate_all(&self.server, locale);
            tracing::info!(locale, widgets = updated, "client locale negotiated");
        }

        if let Some(previous) = previous {
            return previous.handle(request).await;
        }

        let params: InitializeParams = request.parse_params()?;
        to_result_value(&self.synthesize_initialize(&params))
    }

    fn synthesize_initialize(&self, params: &InitializeParams) -> InitializeResult {
        let extensions = self.advertise_ui_extension.then(|| {
            let mut extensions = Map::new();
            extensions.insert(UI_EXTENSION.to_owned(), json!({}));
            extensions
        });

        InitializeResult {
            protocol_version: params
                .protocol_version
                .clone()
                .unwrap_or_else(|| PROTOCOL_VERSION.to_owned()),
            capabilities: ServerCapabilities {
                tools: ListChanged { list_changed: true },
                resources: ListChanged { list_changed: true },
                extensions,
            },
            server_info: Implementation {
                name: SERVER_NAME.to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
            },
        }
    }

    // =========================================================================
    // tools/list, resources/list, resources/read
    // =========================================================================

    pub fn list_tools(&self) -> Vec<Tool> {
        let policy = self.server.policy();
        self.server
            .registry()
            .snapshot()
            .iter()
            .map(|entry| build_tool(entry.widget(), policy))
            .collect()
    }

    pub fn list_resources(&self) -> Vec<Resource> {
        self.server
            .registry()
            .snapshot()
            .iter()
            .map(|entry| build_ui_resource(entry.widget()))
            .collect()
    }

    pub fn read_resource(&self, uri: &str) -> ReadResourceResult {
        let Some(entry) = self.server.registry().get_by_uri(uri) else {
            tracing::debug!(uri, "read of unknown resource");
            return ReadResourceResult::unknown(uri);
        };

        let widget = entry.widget();
        ReadResourceResult {
            contents: vec![TextResourceContents {
                uri: widget.template_uri().to_owned(),
                mime_type: WIDGET_MIME_TYPE.to_owned(),
                text: widget.html().to_owned(),
                meta: build_ui_meta(widget),
            }],
            meta: None,
        }
    }

    // =========================================================================
    // tools/call
    // =========================================================================

    /// Runs a tool call to completion. Never fails: every error is folded
    /// into an `isError` result.
    pub async fn call_tool(&self, params: CallToolParams, context: RequestContext) -> CallToolResult {
        let name = params.name.clone();
        match self.try_call_tool(params, context).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(tool = %name, %error, "tool call failed");
                CallToolResult::error(error.to_string())
            }
        }
    }

    async fn try_call_tool(
        &self,
        params: CallToolParams,
        context: RequestContext,
    ) -> Result<CallToolResult, CallToolError> {
        let entry = self
            .server
            .registry()
            .get_by_id(&params.name)
            .ok_or_else(|| CallToolError::UnknownTool(params.name.clone()))?;
        let widget = entry.widget();

        let access_token = context.access_token.or_else(|| {
            params
                .meta
                .get(META_ACCESS_TOKEN)
                .and_then(AccessToken::from_meta)
        });

        let decision = evaluate(AuthRequest {
            widget_requires_auth: widget.auth_required(),
            server_requires_auth: self.server.policy().requires_auth,
            token_scopes: access_token.as_ref().map(|t| t.scopes.as_slice()),
            required_scopes: widget.auth_scopes(),
        });
        if let AuthDecision::Deny(denial) = decision {
            return Err(denial.into());
        }

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        let input = widget
            .parse_input(arguments)
            .map_err(|e| CallToolError::Validation(e.to_string()))?;

        if let Some(locale) = requested_locale(&params.meta) {
            negotiate_for(&entry, locale).map_err(|e| CallToolError::Execution(e.to_string()))?;
        }

        let client = ClientContext::new(params.meta, entry.resolved_locale());
        let user = UserContext::new(access_token);

        let structured = AssertUnwindSafe(widget.execute_parsed(input, &client, &user))
            .catch_unwind()
            .await
            .map_err(|_| CallToolError::Execution("widget execution panicked".to_owned()))?
            .map_err(|e| match e {
                WidgetError::Validation(message) => CallToolError::Validation(message),
                other => CallToolError::Execution(other.to_string()),
            })?;

        Ok(CallToolResult::success(widget.invoked(), structured))
    }
}

impl ProtocolAdapter for McpAppsAdapter {
    fn register_handlers(&self, registry: &mut HandlerRegistry) {
        let previous = registry.get(RequestKind::Initialize);
        registry.register(
            RequestKind::Initialize,
            Arc::new(InitializeHandler {
                adapter: self.clone(),
                previous,
            }),
        );
        registry.register(RequestKind::ListTools, Arc::new(ListToolsHandler(self.clone())));
        registry.register(
            RequestKind::ListResources,
            Arc::new(ListResourcesHandler(self.clone())),
        );
        registry.register(
            RequestKind::ReadResource,
            Arc::new(ReadResourceHandler(self.clone())),
        );
        registry.register(RequestKind::CallTool, Arc::new(CallToolHandler(self.clone())));
    }
}

// =============================================================================
// Handlers
// =============================================================================

struct InitializeHandler {
    adapter: McpAppsAdapter,
    previous: Option<Arc<dyn RequestHandler>>,
}

#[async_trait]
impl RequestHandler for InitializeHandler {
    async fn handle(&self, request: McpRequest) -> Result<Value, RpcError> {
        self.adapter
            .initialize(request, self.previous.as_deref())
            .await
    }
}

struct ListToolsHandler(McpAppsAdapter);

#[async_trait]
impl RequestHandler for ListToolsHandler {
    async fn handle(&self, _request: McpRequest) -> Result<Value, RpcError> {
        to_result_value(&ListToolsResult {
            tools: self.0.list_tools(),
        })
    }
}

struct ListResourcesHandler(McpAppsAdapter);

#[async_trait]
impl RequestHandler for ListResourcesHandler {
    async fn handle(&self, _request: McpRequest) -> Result<Value, RpcError> {
        to_result_value(&ListResourcesResult {
            resources: self.0.list_resources(),
        })
    }
}

struct ReadResourceHandler(McpAppsAdapter);

#[async_trait]
impl RequestHandler for ReadResourceHandler {
    async fn handle(&self, request: McpRequest) -> Result<Value, RpcError> {
        let params: ReadResourceParams = request.parse_params()?;
        to_result_value(&self.0.read_resource(&params.uri))
    }
}

struct CallToolHandler(McpAppsAdapter);

#[async_trait]
impl RequestHandler for CallToolHandler {
    async fn handle(&self, request: McpRequest) -> Result<Value, RpcError> {
        let params: CallToolParams = request.parse_params()?;
        to_result_value(&self.0.call_tool(params, request.context).await)
    }
}
