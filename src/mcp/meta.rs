//! Resource and Tool Metadata
//!
//! Maps widget presentation preferences onto the MCP Apps `_meta` shapes
//! used by tool listings, resource listings and resource reads.

use super::models::{Resource, Tool, ToolMeta, UiCsp, UiMeta, UiPresentation, WIDGET_MIME_TYPE};
use crate::widget::{SecurityScheme, ServerPolicy, WidgetDescriptor};

/// Builds the `_meta.ui` block for a widget.
///
/// Empty CSP lists, a missing domain and a false border preference are all
/// omitted rather than emitted as empty values.
pub fn build_ui_meta<W: WidgetDescriptor + ?Sized>(widget: &W) -> UiMeta {
    let csp = widget
        .csp()
        .map(|csp| UiCsp {
            connect_domains: csp.connect_domains.clone(),
            resource_domains: csp.resource_domains.clone(),
        })
        .filter(|csp| !csp.connect_domains.is_empty() || !csp.resource_domains.is_empty());

    UiMeta {
        ui: UiPresentation {
            csp,
            domain: widget.domain().filter(|d| !d.is_empty()).map(str::to_owned),
            prefers_border: widget.prefers_border().then_some(true),
        },
    }
}

/// Resource descriptor listing the widget's markup.
pub fn build_ui_resource<W: WidgetDescriptor + ?Sized>(widget: &W) -> Resource {
    Resource {
        name: widget.title().to_owned(),
        title: widget.title().to_owned(),
        uri: widget.template_uri().to_owned(),
        description: format!("{} widget markup", widget.title()),
        mime_type: WIDGET_MIME_TYPE.to_owned(),
        meta: build_ui_meta(widget),
    }
}

/// Tool descriptor for a widget.
///
/// Schemes the widget declares win; otherwise a server that requires auth
/// advertises OAuth 2.0 with its default scopes.
pub fn build_tool<W: WidgetDescriptor + ?Sized>(widget: &W, policy: &ServerPolicy) -> Tool {
    let security_schemes = widget.security_schemes().or_else(|| {
        policy.requires_auth.then(|| {
            vec![SecurityScheme::Oauth2 {
                scopes: policy.auth_scopes.clone(),
            }]
        })
    });

    Tool {
        name: widget.identifier().to_owned(),
        title: widget.title().to_owned(),
        description: widget
            .description()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| widget.title())
            .to_owned(),
        input_schema: widget.input_schema(),
        meta: ToolMeta {
            resource_uri: widget.template_uri().to_owned(),
            security_schemes,
        },
    }
}
