//! MCP Protocol Models and Constants
//!
//! This module contains all data structures and constants related to the
//! Model Context Protocol (MCP) and its Apps (UI) extension.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::widget::SecurityScheme;

// =============================================================================
// MCP Constants
// =============================================================================

/// MIME type of widget markup under the MCP Apps extension
pub const WIDGET_MIME_TYPE: &str = "text/html+mcp";
/// Server identifier reported by the synthesized initialize result
pub const SERVER_NAME: &str = "mcp-apps-rust";
/// Protocol version used when the client does not send one
pub const PROTOCOL_VERSION: &str = "2025-06-18";
/// Capability key advertising the MCP Apps extension
pub const UI_EXTENSION: &str = "io.modelcontextprotocol/ui";

/// Metadata key carrying the requested locale
pub const META_LOCALE: &str = "openai/locale";
/// Legacy metadata key carrying the requested locale
pub const META_LOCALE_LEGACY: &str = "webplus/i18n";
/// Metadata key carrying a fallback access token
pub const META_ACCESS_TOKEN: &str = "access_token";

// =============================================================================
// JSON-RPC Envelope
// =============================================================================

/// Standard JSON-RPC 2.0 Request envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0")
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,

    /// Method name to invoke
    pub method: String,

    /// Parameters for the method
    pub params: Option<Value>,

    /// Request identifier
    pub id: Option<Value>,
}

// =============================================================================
// Request Parameters
// =============================================================================

/// `_meta` may be omitted or sent as `null`; both read as empty.
fn meta_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The parts of `initialize` params a synthesized result echoes back.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: Option<String>,
}

/// Parameters of `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

/// Parameters of `tools/call`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallToolParams {
    pub name: String,

    #[serde(default)]
    pub arguments: Option<Value>,

    #[serde(rename = "_meta", default, deserialize_with = "meta_or_empty")]
    pub meta: Map<String, Value>,
}

// =============================================================================
// Results
// =============================================================================

/// Name and version of a protocol participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChanged {
    pub list_changed: bool,
}

/// Capabilities advertised by the synthesized initialize result.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub tools: ListChanged,
    pub resources: ListChanged,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
}

/// Metadata attached to a tool listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolMeta {
    #[serde(rename = "ui/resourceUri")]
    pub resource_uri: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<Vec<SecurityScheme>>,
}

/// Outbound tool descriptor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: Value,

    #[serde(rename = "_meta")]
    pub meta: ToolMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListToolsResult {
    pub tools: Vec<Tool>,
}

/// CSP block of the UI metadata. Empty lists are omitted.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UiCsp {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connect_domains: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_domains: Vec<String>,
}

/// Presentation hints under `_meta.ui`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiPresentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csp: Option<UiCsp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefers_border: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UiMeta {
    pub ui: UiPresentation,
}

/// Outbound resource descriptor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    pub title: String,
    pub uri: String,
    pub description: String,
    pub mime_type: String,

    #[serde(rename = "_meta")]
    pub meta: UiMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResourcesResult {
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,

    #[serde(rename = "_meta")]
    pub meta: UiMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    pub contents: Vec<TextResourceContents>,

    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ReadResourceResult {
    /// Well-formed result for a URI no widget serves.
    pub fn unknown(uri: &str) -> Self {
        Self {
            contents: Vec::new(),
            meta: Some(serde_json::json!({ "error": format!("Unknown resource: {}", uri) })),
        }
    }
}

/// A text content block.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

/// Result of `tools/call`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<TextContent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn success(text: impl Into<String>, structured_content: Value) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            structured_content: Some(structured_content),
            is_error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            structured_content: None,
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content block.
    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}
