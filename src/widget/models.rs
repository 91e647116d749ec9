//! Widget Capability Models
//!
//! This module contains the capability interface every widget implements,
//! together with the execution contexts handed to it on each tool call.

use std::any::Any;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::helpers::negotiate_locale;
use crate::auth::AccessToken;

// =============================================================================
// Errors
// =============================================================================

/// Failures a widget may report back to the adapter.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// Call arguments could not be parsed into the widget input.
    #[error("{0}")]
    Validation(String),

    /// The widget failed while producing its structured result.
    #[error("{0}")]
    Execution(String),

    /// The widget could not resolve the requested locale.
    #[error("cannot negotiate locale {requested:?}: {reason}")]
    Locale { requested: String, reason: String },
}

impl WidgetError {
    /// Shorthand for an execution failure.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

// =============================================================================
// Presentation Models
// =============================================================================

/// Content security policy preferences declared by a widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WidgetCsp {
    /// Origins the widget loads static resources from.
    #[serde(default)]
    pub resource_domains: Vec<String>,

    /// Origins the widget opens network connections to.
    #[serde(default)]
    pub connect_domains: Vec<String>,
}

/// Security scheme advertised on a tool listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecurityScheme {
    /// The tool may be called anonymously.
    Noauth,

    /// The tool expects an OAuth 2.0 bearer token carrying `scopes`.
    Oauth2 {
        #[serde(default)]
        scopes: Vec<String>,
    },
}

// =============================================================================
// Execution Contexts
// =============================================================================

/// Client-side information available to a widget during execution.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    meta: Map<String, Value>,
    locale: Option<String>,
}

impl ClientContext {
    /// Builds a context from the request metadata and the widget's resolved locale.
    pub fn new(meta: Map<String, Value>, locale: Option<String>) -> Self {
        Self { meta, locale }
    }

    /// Looks up a single metadata entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    /// Locale resolved for this widget, if any was negotiated.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Host user agent, when the client reports one.
    pub fn user_agent(&self) -> Option<&str> {
        self.get("openai/userAgent").and_then(Value::as_str)
    }
}

/// Authenticated caller information available to a widget.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    access_token: Option<AccessToken>,
}

impl UserContext {
    pub fn new(access_token: Option<AccessToken>) -> Self {
        Self { access_token }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Subject claim of the token, if the verifier supplied one.
    pub fn subject(&self) -> Option<&str> {
        self.access_token.as_ref()?.subject.as_deref()
    }

    pub fn scopes(&self) -> &[String] {
        self.access_token
            .as_ref()
            .map(|token| token.scopes.as_slice())
            .unwrap_or_default()
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().iter().any(|granted| granted == scope)
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// Descriptive half of the widget capability: everything the adapter needs
/// to list, authorize and localize a widget without running it.
pub trait WidgetDescriptor: Send + Sync {
    /// Stable tool name, unique within the registry.
    fn identifier(&self) -> &str;

    fn title(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// URI of the UI resource rendered for this widget, unique within the registry.
    fn template_uri(&self) -> &str;

    /// JSON schema advertised for the tool arguments.
    fn input_schema(&self) -> Value;

    /// Rendered HTML markup served for `template_uri`.
    fn html(&self) -> &str;

    /// Short placeholder text returned alongside the structured result.
    fn invoked(&self) -> &str {
        "Widget ready"
    }

    /// `Some(true)`/`Some(false)` pins the requirement; `None` defers to the server.
    fn auth_required(&self) -> Option<bool> {
        None
    }

    fn auth_scopes(&self) -> &[String] {
        &[]
    }

    /// Schemes the widget advertises itself, overriding the server default.
    fn security_schemes(&self) -> Option<Vec<SecurityScheme>> {
        None
    }

    fn csp(&self) -> Option<&WidgetCsp> {
        None
    }

    fn domain(&self) -> Option<&str> {
        None
    }

    fn prefers_border(&self) -> bool {
        false
    }

    fn supported_locales(&self) -> &[String] {
        &[]
    }

    fn default_locale(&self) -> &str {
        "en"
    }

    /// Resolves `requested` to the best locale this widget supports.
    fn negotiate_locale(&self, requested: &str) -> Result<String, WidgetError> {
        Ok(negotiate_locale(
            requested,
            self.supported_locales(),
            self.default_locale(),
        ))
    }
}

/// A UI-producing tool with a typed input.
///
/// Arguments are decoded into [`Widget::Input`] with serde; a decoding
/// failure is reported to the caller as a validation error.
#[async_trait]
pub trait Widget: WidgetDescriptor + 'static {
    type Input: DeserializeOwned + Send + 'static;

    async fn execute(
        &self,
        input: Self::Input,
        client: &ClientContext,
        user: &UserContext,
    ) -> Result<Value, WidgetError>;
}

/// Arguments already validated by the widget that will execute them.
pub struct ParsedInput(Box<dyn Any + Send>);

impl std::fmt::Debug for ParsedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ParsedInput(..)")
    }
}

/// Type-erased widget as stored in the registry.
#[async_trait]
pub trait DynWidget: WidgetDescriptor {
    fn parse_input(&self, arguments: Value) -> Result<ParsedInput, WidgetError>;

    async fn execute_parsed(
        &self,
        input: ParsedInput,
        client: &ClientContext,
        user: &UserContext,
    ) -> Result<Value, WidgetError>;
}

#[async_trait]
impl<W: Widget> DynWidget for W {
    fn parse_input(&self, arguments: Value) -> Result<ParsedInput, WidgetError> {
        let input: W::Input = serde_json::from_value(arguments)
            .map_err(|e| WidgetError::Validation(format!("Invalid arguments: {}", e)))?;
        Ok(ParsedInput(Box::new(input)))
    }

    async fn execute_parsed(
        &self,
        input: ParsedInput,
        client: &ClientContext,
        user: &UserContext,
    ) -> Result<Value, WidgetError> {
        let input = input.0.downcast::<W::Input>().map_err(|_| {
            WidgetError::Validation(format!(
                "input was not parsed by widget {}",
                self.identifier()
            ))
        })?;
        self.execute(*input, client, user).await
    }
}
