//! Locale Negotiation Triggers
//!
//! Widgets own the matching algorithm; this module decides when it runs:
//! for every widget on initialize, and for the target widget on each call.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{Map, Value};

use super::models::{META_LOCALE, META_LOCALE_LEGACY};
use crate::widget::{RegisteredWidget, WidgetDescriptor, WidgetError, WidgetServer};

/// Requested locale from request metadata; the first non-empty key wins.
pub fn requested_locale(meta: &Map<String, Value>) -> Option<&str> {
    [META_LOCALE, META_LOCALE_LEGACY]
        .into_iter()
        .filter_map(|key| meta.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|locale| !locale.is_empty())
}

/// Negotiates `requested` for one widget and stores the outcome.
///
/// A panicking negotiator is reported as a locale error and leaves the
/// stored locale untouched.
pub fn negotiate_for(entry: &RegisteredWidget, requested: &str) -> Result<String, WidgetError> {
    let resolved = panic::catch_unwind(AssertUnwindSafe(|| {
        entry.widget().negotiate_locale(requested)
    }))
    .unwrap_or_else(|_| {
        Err(WidgetError::Locale {
            requested: requested.to_owned(),
            reason: "negotiation panicked".to_owned(),
        })
    })?;
    entry.set_resolved_locale(resolved.clone());
    Ok(resolved)
}

/// Records `requested` as the process-wide hint and renegotiates every widget.
///
/// A widget whose negotiation fails keeps its previous locale; the others
/// are still updated. Returns how many widgets were updated.
pub fn renegotiate_all(server: &WidgetServer, requested: &str) -> usize {
    server.set_client_locale(requested);

    let mut updated = 0;
    for entry in server.registry().snapshot() {
        match negotiate_for(&entry, requested) {
            Ok(resolved) => {
                tracing::debug!(
                    widget = entry.widget().identifier(),
                    requested,
                    resolved = %resolved,
                    "negotiated widget locale"
                );
                updated += 1;
            }
            Err(error) => {
                tracing::warn!(
                    widget = entry.widget().identifier(),
                    requested,
                    %error,
                    "locale negotiation failed, keeping previous locale"
                );
            }
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn primary_key_wins() {
        let meta = meta(json!({ "openai/locale": "fr-FR", "webplus/i18n": "de-DE" }));
        assert_eq!(requested_locale(&meta), Some("fr-FR"));
    }

    #[test]
    fn empty_primary_key_falls_through_to_legacy() {
        let meta = meta(json!({ "openai/locale": "", "webplus/i18n": "de-DE" }));
        assert_eq!(requested_locale(&meta), Some("de-DE"));
    }

    #[test]
    fn absent_or_non_string_locale_is_none() {
        assert_eq!(requested_locale(&Map::new()), None);
        assert_eq!(requested_locale(&meta(json!({ "openai/locale": 7 }))), None);
    }
}
