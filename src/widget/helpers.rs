//! Widget Helpers
//!
//! Small pure functions shared by widget implementations: default locale
//! matching and the protocol hint injected into widget markup.

/// Resolves a requested locale tag against the locales a widget supports.
///
/// # Behaviour
///
/// * An exact match (case-insensitive, `_` and `-` treated alike) wins.
/// * Otherwise the first supported locale sharing the primary language
///   subtag is used (`fr-CA` matches `fr` or `fr-FR`).
/// * Otherwise `default` is returned.
///
/// A widget that declares no supported locales always resolves to `default`.
pub fn negotiate_locale(requested: &str, supported: &[String], default: &str) -> String {
    let wanted = normalize_tag(requested);
    if wanted.is_empty() {
        return default.to_owned();
    }

    if let Some(exact) = supported.iter().find(|s| normalize_tag(s) == wanted) {
        return exact.clone();
    }

    let language = primary_subtag(&wanted);
    supported
        .iter()
        .find(|s| primary_subtag(&normalize_tag(s)) == language)
        .cloned()
        .unwrap_or_else(|| default.to_owned())
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Protocol name exposed to the widget runtime for MCP Apps hosts.
pub const MCP_APPS_PROTOCOL: &str = "mcp-apps";

/// Injects a script exposing the active protocol to the UI runtime.
///
/// The hint goes right before the first `</head>`; markup without a head
/// gets it prepended.
pub fn inject_protocol_hint(html: &str, protocol: &str) -> String {
    let hint = format!(r#"<script>window.__MCP_APPS_PROTOCOL="{}";</script>"#, protocol);
    match html.find("</head>") {
        Some(index) => {
            let mut out = String::with_capacity(html.len() + hint.len());
            out.push_str(&html[..index]);
            out.push_str(&hint);
            out.push_str(&html[index..]);
            out
        }
        None => hint + html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn exact_match_is_preferred() {
        let supported = locales(&["en", "fr", "fr-FR"]);
        assert_eq!(negotiate_locale("fr-FR", &supported, "en"), "fr-FR");
        assert_eq!(negotiate_locale("fr_fr", &supported, "en"), "fr-FR");
    }

    #[test]
    fn falls_back_to_primary_language() {
        let supported = locales(&["en-US", "de-DE"]);
        assert_eq!(negotiate_locale("de-AT", &supported, "en-US"), "de-DE");
    }

    #[test]
    fn unknown_or_empty_locale_uses_default() {
        let supported = locales(&["en"]);
        assert_eq!(negotiate_locale("ja-JP", &supported, "en"), "en");
        assert_eq!(negotiate_locale("  ", &supported, "en"), "en");
        assert_eq!(negotiate_locale("ja-JP", &[], "en"), "en");
    }

    #[test]
    fn protocol_hint_lands_before_head_close() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let injected = inject_protocol_hint(html, MCP_APPS_PROTOCOL);
        assert!(injected.contains(
            r#"<script>window.__MCP_APPS_PROTOCOL="mcp-apps";</script></head>"#
        ));
        assert_eq!(injected.matches("<script>").count(), 1);
    }

    #[test]
    fn protocol_hint_is_prepended_without_head() {
        let injected = inject_protocol_hint("<div id=\"root\"></div>", MCP_APPS_PROTOCOL);
        assert!(injected.starts_with("<script>"));
        assert!(injected.ends_with("<div id=\"root\"></div>"));
    }
}
