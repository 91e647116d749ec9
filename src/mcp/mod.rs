//! Model Context Protocol (MCP) Module
//!
//! This module contains all MCP protocol implementation, including:
//! - Protocol models (JsonRpcRequest, tool/resource descriptors, constants)
//! - RPC helpers (success/error responses)
//! - The handler registry the transport dispatches through
//! - The MCP Apps adapter (initialize, tools/list, tools/call, etc.)
//! - HTTP routes hosting the registry

pub mod adapter;
pub mod dispatch;
pub mod handlers;
pub mod helpers;
pub mod locale;
pub mod meta;
pub mod models;

// Re-export commonly used types and functions
pub use adapter::{CallToolError, McpAppsAdapter, ProtocolAdapter};
pub use dispatch::{HandlerRegistry, McpRequest, RequestContext, RequestHandler, RequestKind, RpcError};
pub use handlers::routes;
