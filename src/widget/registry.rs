//! Widget Registry
//!
//! Owns every registered widget and indexes it twice: by tool identifier
//! and by template URI. Handlers never hold on to a snapshot across
//! requests; each lookup reads the current registry state.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, PoisonError, RwLock},
};

use super::models::{DynWidget, WidgetDescriptor};

/// Errors raised while mutating the registry.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RegistryError {
    #[error("widget identifier already registered: {0}")]
    DuplicateIdentifier(String),

    #[error("template URI already registered: {0}")]
    DuplicateTemplateUri(String),
}

/// A widget as held by the registry, together with its negotiated locale.
pub struct RegisteredWidget {
    widget: Arc<dyn DynWidget>,
    resolved_locale: RwLock<Option<String>>,
}

impl RegisteredWidget {
    fn new(widget: Arc<dyn DynWidget>) -> Self {
        Self {
            widget,
            resolved_locale: RwLock::new(None),
        }
    }

    pub fn widget(&self) -> &dyn DynWidget {
        self.widget.as_ref()
    }

    /// Last locale negotiated for this widget.
    pub fn resolved_locale(&self) -> Option<String> {
        self.resolved_locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrites the negotiated locale. Concurrent writers race; the last one wins.
    pub fn set_resolved_locale(&self, locale: String) {
        *self
            .resolved_locale
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(locale);
    }
}

impl std::fmt::Debug for RegisteredWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredWidget")
            .field("identifier", &self.widget.identifier())
            .field("template_uri", &self.widget.template_uri())
            .field("resolved_locale", &self.resolved_locale())
            .finish()
    }
}

#[derive(Default)]
struct Indexes {
    by_id: BTreeMap<String, Arc<RegisteredWidget>>,
    by_uri: HashMap<String, Arc<RegisteredWidget>>,
}

/// Widgets indexed by identifier and by template URI.
///
/// Iteration follows identifier order, which keeps listings stable for the
/// lifetime of the process as long as the registry is not mutated.
#[derive(Default)]
pub struct WidgetRegistry {
    indexes: RwLock<Indexes>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a widget, rejecting duplicate identifiers and template URIs.
    pub fn register(&self, widget: Arc<dyn DynWidget>) -> Result<(), RegistryError> {
        let mut indexes = self.indexes.write().unwrap_or_else(PoisonError::into_inner);

        let id = widget.identifier().to_owned();
        let uri = widget.template_uri().to_owned();
        if indexes.by_id.contains_key(&id) {
            return Err(RegistryError::DuplicateIdentifier(id));
        }
        if indexes.by_uri.contains_key(&uri) {
            return Err(RegistryError::DuplicateTemplateUri(uri));
        }

        let entry = Arc::new(RegisteredWidget::new(widget));
        tracing::debug!(widget = %id, uri = %uri, "registered widget");
        indexes.by_id.insert(id, Arc::clone(&entry));
        indexes.by_uri.insert(uri, entry);
        Ok(())
    }

    /// Removes a widget by identifier, returning it when it was present.
    pub fn remove(&self, identifier: &str) -> Option<Arc<RegisteredWidget>> {
        let mut indexes = self.indexes.write().unwrap_or_else(PoisonError::into_inner);
        let entry = indexes.by_id.remove(identifier)?;
        indexes.by_uri.remove(entry.widget().template_uri());
        Some(entry)
    }

    pub fn get_by_id(&self, identifier: &str) -> Option<Arc<RegisteredWidget>> {
        self.indexes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .get(identifier)
            .cloned()
    }

    pub fn get_by_uri(&self, uri: &str) -> Option<Arc<RegisteredWidget>> {
        self.indexes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_uri
            .get(uri)
            .cloned()
    }

    /// Current widgets in identifier order.
    pub fn snapshot(&self) -> Vec<Arc<RegisteredWidget>> {
        self.indexes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indexes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
