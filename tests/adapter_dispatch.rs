//! Dispatch tests for the MCP Apps adapter
//!
//! These tests exercise the handler pipeline directly against purpose-built
//! widgets:
//! - Unknown tools and resources
//! - Per-tool authentication and scope checks
//! - Argument validation and execution failures
//! - Locale negotiation on initialize and on each call
//! - Host initialize pass-through

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mcp_apps_rust::auth::AccessToken;
use mcp_apps_rust::mcp::dispatch::HostInitializeHandler;
use mcp_apps_rust::mcp::models::{CallToolParams, CallToolResult, Implementation};
use mcp_apps_rust::mcp::{
    HandlerRegistry, McpAppsAdapter, McpRequest, ProtocolAdapter, RequestContext, RequestKind,
};
use mcp_apps_rust::widget::{
    ClientContext, ServerPolicy, UserContext, Widget, WidgetDescriptor, WidgetError, WidgetServer,
};

// =============================================================================
// Test widgets
// =============================================================================

#[derive(Clone, Copy)]
enum Behavior {
    Echo,
    Fail,
    Panic,
    /// Reports what the widget can see of the caller.
    Context,
}

struct TestWidget {
    id: String,
    uri: String,
    html: String,
    auth_required: Option<bool>,
    scopes: Vec<String>,
    locales: Vec<String>,
    broken_locale: bool,
    panicking_locale: bool,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl TestWidget {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            uri: format!("ui://widget/{}.html", id),
            html: format!("<html><head></head><body>{}</body></html>", id),
            auth_required: None,
            scopes: Vec::new(),
            locales: vec!["en".to_string()],
            broken_locale: false,
            panicking_locale: false,
            behavior: Behavior::Echo,
            calls: AtomicUsize::new(0),
        }
    }

    fn auth(mut self, required: Option<bool>, scopes: &[&str]) -> Self {
        self.auth_required = required;
        self.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    fn locales(mut self, locales: &[&str]) -> Self {
        self.locales = locales.iter().map(|s| s.to_string()).collect();
        self
    }

    fn broken_locale(mut self) -> Self {
        self.broken_locale = true;
        self
    }

    fn panicking_locale(mut self) -> Self {
        self.panicking_locale = true;
        self
    }

    fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EchoInput {
    x: i64,
}

impl WidgetDescriptor for TestWidget {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.id
    }

    fn template_uri(&self) -> &str {
        &self.uri
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "x": { "type": "integer" } },
            "required": ["x"]
        })
    }

    fn html(&self) -> &str {
        &self.html
    }

    fn invoked(&self) -> &str {
        "Rendered"
    }

    fn auth_required(&self) -> Option<bool> {
        self.auth_required
    }

    fn auth_scopes(&self) -> &[String] {
        &self.scopes
    }

    fn supported_locales(&self) -> &[String] {
        &self.locales
    }

    fn negotiate_locale(&self, requested: &str) -> Result<String, WidgetError> {
        if self.panicking_locale {
            let table: Vec<String> = Vec::new();
            return Ok(table[0].clone());
        }
        if self.broken_locale {
            return Err(WidgetError::Locale {
                requested: requested.to_string(),
                reason: "catalog unavailable".to_string(),
            });
        }
        Ok(mcp_apps_rust::widget::helpers::negotiate_locale(
            requested,
            &self.locales,
            "en",
        ))
    }
}

#[async_trait]
impl Widget for TestWidget {
    type Input = EchoInput;

    async fn execute(
        &self,
        input: EchoInput,
        client: &ClientContext,
        user: &UserContext,
    ) -> Result<Value, WidgetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Echo => Ok(json!({ "x": input.x, "locale": client.locale() })),
            Behavior::Fail => Err(WidgetError::execution("boom")),
            Behavior::Panic => panic!("widget blew up"),
            Behavior::Context => Ok(json!({
                "x": input.x,
                "userAgent": client.user_agent(),
                "authenticated": user.is_authenticated(),
                "subject": user.subject(),
                "scopes": user.scopes(),
                "canRead": user.has_scope("read"),
            })),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn server_with(policy: ServerPolicy, widgets: Vec<Arc<TestWidget>>) -> Arc<WidgetServer> {
    let server = Arc::new(WidgetServer::new(policy));
    for widget in widgets {
        server.registry().register(widget).unwrap();
    }
    server
}

fn call_params(name: &str, arguments: Value, meta: Value) -> CallToolParams {
    serde_json::from_value(json!({
        "name": name,
        "arguments": arguments,
        "_meta": meta,
    }))
    .unwrap()
}

async fn call(adapter: &McpAppsAdapter, name: &str, arguments: Value) -> CallToolResult {
    adapter
        .call_tool(call_params(name, arguments, json!({})), RequestContext::default())
        .await
}

async fn call_with_token(
    adapter: &McpAppsAdapter,
    name: &str,
    token: AccessToken,
) -> CallToolResult {
    let context = RequestContext {
        access_token: Some(token),
    };
    adapter
        .call_tool(call_params(name, json!({ "x": 1 }), json!({})), context)
        .await
}

fn resolved_locale(server: &WidgetServer, id: &str) -> Option<String> {
    server.registry().get_by_id(id).unwrap().resolved_locale()
}

// =============================================================================
// tools/call
// =============================================================================

#[tokio::test]
async fn unknown_tool_names_become_error_results() {
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![]), true);

    for name in ["missing", "", "tools/call", "ünïcode tool"] {
        let result = call(&adapter, name, json!({})).await;
        assert!(result.is_error());
        assert_eq!(result.text(), format!("Unknown tool: {}", name));
    }
}

#[tokio::test]
async fn open_widget_returns_structured_content() {
    let w1 = Arc::new(TestWidget::new("w1").auth(Some(false), &[]));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![w1.clone()]), true);

    let result = call(&adapter, "w1", json!({ "x": 1 })).await;

    assert!(!result.is_error());
    assert_eq!(result.is_error, None);
    assert_eq!(result.text(), "Rendered");
    assert_eq!(result.structured_content, Some(json!({ "x": 1, "locale": null })));
    assert_eq!(w1.calls(), 1);
}

#[tokio::test]
async fn required_auth_without_token_never_executes() {
    let w2 = Arc::new(TestWidget::new("w2").auth(Some(true), &["read"]));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![w2.clone()]), true);

    let result = call(&adapter, "w2", json!({ "x": 1 })).await;

    assert!(result.is_error());
    assert_eq!(result.text(), "Authentication required for this tool");
    assert_eq!(w2.calls(), 0);
}

#[tokio::test]
async fn token_without_scopes_lists_missing_scope() {
    let w2 = Arc::new(TestWidget::new("w2").auth(Some(true), &["read"]));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![w2.clone()]), true);

    let result = call_with_token(&adapter, "w2", AccessToken::opaque("t")).await;

    assert!(result.is_error());
    assert_eq!(result.text(), "Missing required scopes: read");
    assert_eq!(w2.calls(), 0);
}

#[tokio::test]
async fn missing_scopes_are_listed_in_sorted_order() {
    let widget = Arc::new(TestWidget::new("admin").auth(None, &["write", "admin", "read"]));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let result = call_with_token(&adapter, "admin", AccessToken::with_scopes("t", ["read"])).await;

    assert_eq!(result.text(), "Missing required scopes: admin, write");
}

#[tokio::test]
async fn sufficient_scopes_execute() {
    let widget = Arc::new(TestWidget::new("w2").auth(Some(true), &["read"]));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let result =
        call_with_token(&adapter, "w2", AccessToken::with_scopes("t", ["read", "write"])).await;

    assert!(!result.is_error());
}

#[tokio::test]
async fn server_default_applies_only_to_unspecified_widgets() {
    let deferring = Arc::new(TestWidget::new("deferring"));
    let open = Arc::new(TestWidget::new("open").auth(Some(false), &[]));
    let policy = ServerPolicy {
        requires_auth: true,
        auth_scopes: vec!["user".to_string()],
    };
    let adapter = McpAppsAdapter::new(server_with(policy, vec![deferring, open]), true);

    let denied = call(&adapter, "deferring", json!({ "x": 1 })).await;
    assert_eq!(denied.text(), "Authentication required for this tool");

    let allowed = call(&adapter, "open", json!({ "x": 1 })).await;
    assert!(!allowed.is_error());
}

#[tokio::test]
async fn authenticated_caller_passes_empty_scope_set_despite_server_scopes() {
    let widget = Arc::new(TestWidget::new("any").auth(Some(true), &[]));
    let policy = ServerPolicy {
        requires_auth: true,
        auth_scopes: vec!["user".to_string()],
    };
    let adapter = McpAppsAdapter::new(server_with(policy, vec![widget]), true);

    let result = call_with_token(&adapter, "any", AccessToken::opaque("t")).await;

    assert!(!result.is_error());
}

#[tokio::test]
async fn metadata_token_is_used_when_context_has_none() {
    let widget = Arc::new(TestWidget::new("w").auth(Some(true), &[]));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let params = call_params("w", json!({ "x": 1 }), json!({ "access_token": "abc" }));
    let result = adapter.call_tool(params, RequestContext::default()).await;

    assert!(!result.is_error());
}

#[tokio::test]
async fn context_token_takes_precedence_over_metadata() {
    let widget = Arc::new(TestWidget::new("w").auth(Some(true), &["read"]));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let params = call_params("w", json!({ "x": 1 }), json!({ "access_token": "meta" }));
    let context = RequestContext {
        access_token: Some(AccessToken::with_scopes("ctx", ["read"])),
    };
    let result = adapter.call_tool(params, context).await;

    assert!(!result.is_error());
}

#[tokio::test]
async fn malformed_arguments_are_reported_not_raised() {
    let widget = Arc::new(TestWidget::new("w"));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget.clone()]), true);

    let result = call(&adapter, "w", json!({ "x": "one" })).await;
    assert!(result.is_error());
    assert!(result.text().starts_with("Error: Invalid arguments"));

    let missing = adapter
        .call_tool(
            serde_json::from_value(json!({ "name": "w" })).unwrap(),
            RequestContext::default(),
        )
        .await;
    assert!(missing.text().starts_with("Error: Invalid arguments"));
    assert_eq!(widget.calls(), 0);
}

#[tokio::test]
async fn validation_failure_leaves_locale_untouched() {
    let widget = Arc::new(TestWidget::new("w").locales(&["en", "fr"]));
    let server = server_with(ServerPolicy::default(), vec![widget]);
    let adapter = McpAppsAdapter::new(server.clone(), true);

    let params = call_params("w", json!({}), json!({ "openai/locale": "fr-FR" }));
    let result = adapter.call_tool(params, RequestContext::default()).await;

    assert!(result.is_error());
    assert_eq!(resolved_locale(&server, "w"), None);
}

#[tokio::test]
async fn execution_failure_becomes_error_result() {
    let widget = Arc::new(TestWidget::new("w").behavior(Behavior::Fail));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let result = call(&adapter, "w", json!({ "x": 1 })).await;

    assert!(result.is_error());
    assert_eq!(result.text(), "Error: boom");
    assert_eq!(result.structured_content, None);
}

#[tokio::test]
async fn execution_panic_becomes_error_result() {
    let widget = Arc::new(TestWidget::new("w").behavior(Behavior::Panic));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let result = call(&adapter, "w", json!({ "x": 1 })).await;

    assert!(result.is_error());
    assert_eq!(result.text(), "Error: widget execution panicked");

    // The adapter keeps serving after a panic.
    let again = call(&adapter, "missing", json!({})).await;
    assert_eq!(again.text(), "Unknown tool: missing");
}

#[tokio::test]
async fn call_negotiates_locale_for_target_widget_only() {
    let target = Arc::new(TestWidget::new("target").locales(&["en", "fr"]));
    let bystander = Arc::new(TestWidget::new("bystander").locales(&["en", "fr"]));
    let server = server_with(ServerPolicy::default(), vec![target, bystander]);
    let adapter = McpAppsAdapter::new(server.clone(), true);

    let params = call_params("target", json!({ "x": 2 }), json!({ "webplus/i18n": "fr-CA" }));
    let result = adapter.call_tool(params, RequestContext::default()).await;

    assert_eq!(result.structured_content, Some(json!({ "x": 2, "locale": "fr" })));
    assert_eq!(resolved_locale(&server, "target").as_deref(), Some("fr"));
    assert_eq!(resolved_locale(&server, "bystander"), None);
    assert_eq!(server.client_locale(), None);
}

#[tokio::test]
async fn broken_locale_negotiation_on_call_is_an_error_result() {
    let widget = Arc::new(TestWidget::new("w").broken_locale());
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget.clone()]), true);

    let params = call_params("w", json!({ "x": 1 }), json!({ "openai/locale": "fr" }));
    let result = adapter.call_tool(params, RequestContext::default()).await;

    assert!(result.is_error());
    assert!(result.text().starts_with("Error: "));
    assert_eq!(widget.calls(), 0);
}

#[tokio::test]
async fn panicking_locale_negotiation_on_call_is_an_error_result() {
    let widget = Arc::new(TestWidget::new("w").panicking_locale());
    let server = server_with(ServerPolicy::default(), vec![widget.clone()]);
    let adapter = McpAppsAdapter::new(server.clone(), true);

    let params = call_params("w", json!({ "x": 1 }), json!({ "openai/locale": "fr" }));
    let result = adapter.call_tool(params, RequestContext::default()).await;

    assert!(result.is_error());
    assert!(result.text().contains("negotiation panicked"));
    assert_eq!(widget.calls(), 0);
    assert_eq!(resolved_locale(&server, "w"), None);
}

#[tokio::test]
async fn null_metadata_reads_as_empty() {
    let widget = Arc::new(TestWidget::new("w"));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let params = call_params("w", json!({ "x": 3 }), Value::Null);
    let result = adapter.call_tool(params, RequestContext::default()).await;

    assert!(!result.is_error());
    assert_eq!(result.structured_content, Some(json!({ "x": 3, "locale": null })));
}

#[tokio::test]
async fn widget_sees_caller_context() {
    let widget = Arc::new(TestWidget::new("ctx").behavior(Behavior::Context));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget]), true);

    let anonymous = call(&adapter, "ctx", json!({ "x": 1 })).await;
    assert_eq!(
        anonymous.structured_content,
        Some(json!({
            "x": 1,
            "userAgent": null,
            "authenticated": false,
            "subject": null,
            "scopes": [],
            "canRead": false,
        }))
    );

    let mut token = AccessToken::with_scopes("t", ["read", "write"]);
    token.subject = Some("user-42".to_string());
    let params = call_params(
        "ctx",
        json!({ "x": 2 }),
        json!({ "openai/userAgent": "host/1.0" }),
    );
    let context = RequestContext {
        access_token: Some(token),
    };
    let known = adapter.call_tool(params, context).await;
    assert_eq!(
        known.structured_content,
        Some(json!({
            "x": 2,
            "userAgent": "host/1.0",
            "authenticated": true,
            "subject": "user-42",
            "scopes": ["read", "write"],
            "canRead": true,
        }))
    );
}

#[tokio::test]
async fn concurrent_calls_on_one_widget_all_complete() {
    let widget = Arc::new(TestWidget::new("w").locales(&["en", "fr", "de"]));
    let server = server_with(ServerPolicy::default(), vec![widget.clone()]);
    let adapter = McpAppsAdapter::new(server.clone(), true);

    let mut tasks = Vec::new();
    for (i, locale) in ["en", "fr", "de"].iter().cycle().take(30).enumerate() {
        let adapter = adapter.clone();
        let params = call_params("w", json!({ "x": i }), json!({ "openai/locale": locale }));
        tasks.push(tokio::spawn(async move {
            adapter.call_tool(params, RequestContext::default()).await
        }));
    }
    for task in tasks {
        assert!(!task.await.unwrap().is_error());
    }

    assert_eq!(widget.calls(), 30);
    let last = resolved_locale(&server, "w").unwrap();
    assert!(["en", "fr", "de"].contains(&last.as_str()));
}

#[tokio::test]
async fn registry_changes_are_visible_to_the_next_request() {
    let server = server_with(ServerPolicy::default(), vec![Arc::new(TestWidget::new("w"))]);
    let adapter = McpAppsAdapter::new(server.clone(), true);

    assert!(!call(&adapter, "w", json!({ "x": 1 })).await.is_error());

    server.registry().remove("w");
    assert_eq!(call(&adapter, "w", json!({ "x": 1 })).await.text(), "Unknown tool: w");
    assert!(adapter.list_tools().is_empty());

    server
        .registry()
        .register(Arc::new(TestWidget::new("later")))
        .unwrap();
    assert_eq!(adapter.list_tools()[0].name, "later");
}

// =============================================================================
// tools/list, resources/list, resources/read
// =============================================================================

#[tokio::test]
async fn list_tools_is_idempotent() {
    let widgets = ["b", "a", "c"]
        .into_iter()
        .map(|id| Arc::new(TestWidget::new(id)))
        .collect();
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), widgets), true);

    let first: Vec<String> = adapter.list_tools().into_iter().map(|t| t.name).collect();
    let second: Vec<String> = adapter.list_tools().into_iter().map(|t| t.name).collect();

    assert_eq!(first, second);
    assert_eq!(first, ["a", "b", "c"]);
}

#[tokio::test]
async fn listed_resource_reads_back_as_widget_markup() {
    let widget = Arc::new(TestWidget::new("w"));
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![widget.clone()]), true);

    for resource in adapter.list_resources() {
        let read = adapter.read_resource(&resource.uri);
        assert_eq!(read.contents.len(), 1);

        let content = &read.contents[0];
        assert_eq!(content.uri, resource.uri);
        assert_eq!(content.mime_type, "text/html+mcp");
        assert_eq!(content.text, widget.html);
        assert_eq!(content.meta, resource.meta);
        assert!(read.meta.is_none());
    }
}

#[tokio::test]
async fn unknown_resource_reads_as_empty_contents() {
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![]), true);

    let read = adapter.read_resource("ui://widget/nope.html");

    assert!(read.contents.is_empty());
    assert_eq!(
        read.meta,
        Some(json!({ "error": "Unknown resource: ui://widget/nope.html" }))
    );
}

// =============================================================================
// initialize
// =============================================================================

fn widgets_for_locale_tests() -> Vec<Arc<TestWidget>> {
    vec![
        Arc::new(TestWidget::new("exact").locales(&["en", "fr-FR"])),
        Arc::new(TestWidget::new("broken").broken_locale()),
        Arc::new(TestWidget::new("language").locales(&["en", "fr"])),
        Arc::new(TestWidget::new("english").locales(&["en"])),
    ]
}

fn initialize_request(params: Value) -> McpRequest {
    McpRequest::new(params)
}

#[tokio::test]
async fn initialize_renegotiates_every_widget() {
    let server = server_with(ServerPolicy::default(), widgets_for_locale_tests());
    let mut handlers = HandlerRegistry::with_host_defaults();
    McpAppsAdapter::new(server.clone(), true).register_handlers(&mut handlers);

    let result = handlers
        .dispatch(
            RequestKind::Initialize,
            initialize_request(json!({
                "protocolVersion": "2025-06-18",
                "_meta": { "openai/locale": "fr-FR" }
            })),
        )
        .await
        .unwrap();

    assert_eq!(server.client_locale().as_deref(), Some("fr-FR"));
    assert_eq!(resolved_locale(&server, "exact").as_deref(), Some("fr-FR"));
    assert_eq!(resolved_locale(&server, "language").as_deref(), Some("fr"));
    assert_eq!(resolved_locale(&server, "english").as_deref(), Some("en"));
    // A failing widget is skipped without blocking the others.
    assert_eq!(resolved_locale(&server, "broken"), None);

    assert_eq!(result["protocolVersion"], "2025-06-18");
    assert_eq!(
        result["capabilities"]["extensions"],
        json!({ "io.modelcontextprotocol/ui": {} })
    );
}

#[tokio::test]
async fn initialize_accepts_legacy_locale_key() {
    let server = server_with(ServerPolicy::default(), widgets_for_locale_tests());
    let adapter = McpAppsAdapter::new(server.clone(), true);

    adapter
        .initialize(
            initialize_request(json!({ "_meta": { "webplus/i18n": "fr-FR" } })),
            None,
        )
        .await
        .unwrap();

    assert_eq!(server.client_locale().as_deref(), Some("fr-FR"));
    assert_eq!(resolved_locale(&server, "exact").as_deref(), Some("fr-FR"));
}

#[tokio::test]
async fn initialize_without_locale_changes_nothing() {
    let server = server_with(ServerPolicy::default(), widgets_for_locale_tests());
    let adapter = McpAppsAdapter::new(server.clone(), true);

    adapter
        .initialize(initialize_request(json!({})), None)
        .await
        .unwrap();

    assert_eq!(server.client_locale(), None);
    assert_eq!(resolved_locale(&server, "exact"), None);
}

#[tokio::test]
async fn initialize_chains_to_host_handler() {
    let server = server_with(ServerPolicy::default(), widgets_for_locale_tests());
    let mut handlers = HandlerRegistry::new();
    handlers.register(
        RequestKind::Initialize,
        Arc::new(HostInitializeHandler {
            server_info: Implementation {
                name: "host".to_string(),
                version: "9.9.9".to_string(),
            },
        }),
    );
    McpAppsAdapter::new(server.clone(), true).register_handlers(&mut handlers);

    let result = handlers
        .dispatch(
            RequestKind::Initialize,
            initialize_request(json!({ "_meta": { "openai/locale": "fr-FR" } })),
        )
        .await
        .unwrap();

    assert_eq!(result["serverInfo"]["name"], "host");
    assert!(result["capabilities"].get("extensions").is_none());
    assert_eq!(resolved_locale(&server, "exact").as_deref(), Some("fr-FR"));
}

#[tokio::test]
async fn panicking_locale_widget_does_not_block_others() {
    let server = server_with(
        ServerPolicy::default(),
        vec![
            Arc::new(TestWidget::new("a-panics").panicking_locale()),
            Arc::new(TestWidget::new("b-healthy").locales(&["en", "fr"])),
        ],
    );
    let mut handlers = HandlerRegistry::with_host_defaults();
    McpAppsAdapter::new(server.clone(), true).register_handlers(&mut handlers);

    let result = handlers
        .dispatch(
            RequestKind::Initialize,
            initialize_request(json!({ "_meta": { "openai/locale": "fr" } })),
        )
        .await
        .unwrap();

    assert_eq!(result["serverInfo"]["name"], "mcp-apps-rust");
    assert_eq!(resolved_locale(&server, "a-panics"), None);
    assert_eq!(resolved_locale(&server, "b-healthy").as_deref(), Some("fr"));
    assert_eq!(server.client_locale().as_deref(), Some("fr"));
}

#[tokio::test]
async fn host_handler_judges_params_the_adapter_does_not_read() {
    let server = server_with(ServerPolicy::default(), widgets_for_locale_tests());
    let mut handlers = HandlerRegistry::new();
    handlers.register(
        RequestKind::Initialize,
        Arc::new(HostInitializeHandler {
            server_info: Implementation {
                name: "host".to_string(),
                version: "9.9.9".to_string(),
            },
        }),
    );
    McpAppsAdapter::new(server.clone(), true).register_handlers(&mut handlers);

    let result = handlers
        .dispatch(
            RequestKind::Initialize,
            initialize_request(json!({
                "protocolVersion": 20250618,
                "clientInfo": { "name": "c" },
                "capabilities": "none",
                "_meta": { "openai/locale": "fr-FR" }
            })),
        )
        .await
        .unwrap();

    assert_eq!(result["serverInfo"]["name"], "host");
    assert_eq!(result["protocolVersion"], "2025-06-18");
    assert_eq!(resolved_locale(&server, "exact").as_deref(), Some("fr-FR"));
}

#[tokio::test]
async fn synthesized_initialize_ignores_partial_client_info() {
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![]), true);

    let result = adapter
        .initialize(
            initialize_request(json!({
                "protocolVersion": "2025-03-26",
                "clientInfo": { "name": "c" },
                "_meta": null
            })),
            None,
        )
        .await
        .unwrap();

    assert_eq!(result["protocolVersion"], "2025-03-26");
}

#[tokio::test]
async fn ui_extension_can_be_switched_off() {
    let adapter = McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![]), false);

    let result = adapter
        .initialize(initialize_request(json!({})), None)
        .await
        .unwrap();

    assert!(result["capabilities"].get("extensions").is_none());
    assert_eq!(result["serverInfo"]["name"], "mcp-apps-rust");
}

#[tokio::test]
async fn registered_handlers_cover_every_widget_request() {
    let mut handlers = HandlerRegistry::with_host_defaults();
    McpAppsAdapter::new(server_with(ServerPolicy::default(), vec![]), true)
        .register_handlers(&mut handlers);

    for kind in [
        RequestKind::Initialize,
        RequestKind::Ping,
        RequestKind::ListTools,
        RequestKind::ListResources,
        RequestKind::ReadResource,
        RequestKind::CallTool,
    ] {
        assert!(handlers.contains(kind), "{:?} not bound", kind);
    }
}
