//! Request Dispatch
//!
//! The host-side registry binding each MCP request type to a handler.
//! Protocol adapters install their handlers here; a handler that replaces
//! an existing binding may keep the previous one and chain to it.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use super::models::{Implementation, PROTOCOL_VERSION};
use crate::auth::AccessToken;

/// JSON-RPC error codes used by the dispatcher.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Request types the registry can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Initialize,
    Ping,
    ListTools,
    ListResources,
    ReadResource,
    CallTool,
}

impl RequestKind {
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "initialize" => Some(Self::Initialize),
            "ping" => Some(Self::Ping),
            "tools/list" => Some(Self::ListTools),
            "resources/list" => Some(Self::ListResources),
            "resources/read" => Some(Self::ReadResource),
            "tools/call" => Some(Self::CallTool),
            _ => None,
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Ping => "ping",
            Self::ListTools => "tools/list",
            Self::ListResources => "resources/list",
            Self::ReadResource => "resources/read",
            Self::CallTool => "tools/call",
        }
    }
}

/// Transport-level information about the caller.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Token verified by the transport, if the caller presented one.
    pub access_token: Option<AccessToken>,
}

/// An inbound request as seen by a handler.
#[derive(Debug, Clone, Default)]
pub struct McpRequest {
    pub params: Value,
    pub context: RequestContext,
}

impl McpRequest {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            context: RequestContext::default(),
        }
    }

    pub fn with_access_token(mut self, token: AccessToken) -> Self {
        self.context.access_token = Some(token);
        self
    }

    /// Decodes the params into `T`; absent params decode as an empty object.
    pub fn parse_params<T: DeserializeOwned>(&self) -> Result<T, RpcError> {
        let params = match &self.params {
            Value::Null => json!({}),
            other => other.clone(),
        };
        serde_json::from_value(params)
            .map_err(|e| RpcError::new(codes::INVALID_PARAMS, format!("Invalid params: {}", e)))
    }
}

/// Protocol-level failure reported as a JSON-RPC error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} ({code})")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Serializes a typed result into the JSON value sent back to the client.
pub fn to_result_value<T: Serialize>(result: &T) -> Result<Value, RpcError> {
    serde_json::to_value(result).map_err(|e| RpcError::new(codes::INTERNAL_ERROR, e.to_string()))
}

/// A handler bound to one request type.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: McpRequest) -> Result<Value, RpcError>;
}

/// Request-type to handler bindings.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<RequestKind, Arc<dyn RequestHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the handlers every host provides regardless of protocol.
    pub fn with_host_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(RequestKind::Ping, Arc::new(PingHandler));
        registry
    }

    /// Binds `handler` to `kind`, returning the handler it replaces.
    pub fn register(
        &mut self,
        kind: RequestKind,
        handler: Arc<dyn RequestHandler>,
    ) -> Option<Arc<dyn RequestHandler>> {
        self.handlers.insert(kind, handler)
    }

    pub fn get(&self, kind: RequestKind) -> Option<Arc<dyn RequestHandler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn contains(&self, kind: RequestKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Routes a request to its handler.
    pub async fn dispatch(&self, kind: RequestKind, request: McpRequest) -> Result<Value, RpcError> {
        let handler = self
            .get(kind)
            .ok_or_else(|| RpcError::new(codes::METHOD_NOT_FOUND, "Method not found"))?;
        tracing::debug!(method = kind.method(), "dispatching request");
        handler.handle(request).await
    }
}

/// Answers `ping` with an empty result.
pub struct PingHandler;

#[async_trait]
impl RequestHandler for PingHandler {
    async fn handle(&self, _request: McpRequest) -> Result<Value, RpcError> {
        Ok(json!({}))
    }
}

/// Host-provided initialize handler reporting a fixed server identity.
pub struct HostInitializeHandler {
    pub server_info: Implementation,
}

#[async_trait]
impl RequestHandler for HostInitializeHandler {
    async fn handle(&self, request: McpRequest) -> Result<Value, RpcError> {
        let version = request
            .params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);
        Ok(json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": true },
                "resources": { "listChanged": true }
            },
            "serverInfo": self.server_info,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip() {
        for kind in [
            RequestKind::Initialize,
            RequestKind::Ping,
            RequestKind::ListTools,
            RequestKind::ListResources,
            RequestKind::ReadResource,
            RequestKind::CallTool,
        ] {
            assert_eq!(RequestKind::from_method(kind.method()), Some(kind));
        }
        assert_eq!(RequestKind::from_method("notifications/initialized"), None);
    }

    #[tokio::test]
    async fn unbound_kind_is_method_not_found() {
        let registry = HandlerRegistry::new();
        let err = registry
            .dispatch(RequestKind::ListTools, McpRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn register_returns_replaced_handler() {
        let mut registry = HandlerRegistry::with_host_defaults();
        assert!(registry.contains(RequestKind::Ping));

        let previous = registry.register(RequestKind::Ping, Arc::new(PingHandler));
        assert!(previous.is_some());
        assert_eq!(
            registry
                .dispatch(RequestKind::Ping, McpRequest::default())
                .await
                .unwrap(),
            json!({})
        );
    }

    #[test]
    fn null_params_decode_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct Empty {
            #[serde(default)]
            value: Option<u8>,
        }
        let parsed: Empty = McpRequest::default().parse_params().unwrap();
        assert_eq!(parsed.value, None);
    }
}
