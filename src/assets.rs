//! Widget Assets
//!
//! Locates the directory holding built widget markup and loads one HTML
//! document per widget at startup.

use std::path::{Path, PathBuf};

use crate::widget::helpers::{inject_protocol_hint, MCP_APPS_PROTOCOL};

/// Errors raised while reading widget markup.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no markup found for widget {name:?} in {}", .dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory containing built widget HTML files.
#[derive(Debug, Clone)]
pub struct AssetsDir {
    root: PathBuf,
}

impl AssetsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Finds the assets directory relative to the working directory.
    pub fn locate() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(Self::locate_from(&current_dir))
    }

    fn locate_from(current_dir: &Path) -> PathBuf {
        // Strategy to locate assets:
        // 1. ./assets
        // 2. ../assets (if running from a subdir)
        // 3. Fallback to "assets" relative path

        if current_dir.join("assets").exists() {
            return current_dir.join("assets");
        }

        if let Some(parent) = current_dir.parent() {
            if parent.join("assets").exists() {
                return parent.join("assets");
            }
        }

        PathBuf::from("assets") // Fallback
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `<name>.html`, or the newest hashed build `<name>-*.html`.
    pub async fn load_html(&self, name: &str) -> Result<String, AssetError> {
        let primary = self.root.join(format!("{}.html", name));
        let path = if primary.exists() {
            primary
        } else {
            self.find_fallback(name).await?
        };

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AssetError::Read { path, source })
    }

    /// Loads markup for a widget and tags it with the MCP Apps protocol hint.
    /// Missing markup degrades to an empty root element.
    pub async fn load_widget_markup(&self, name: &str) -> String {
        let html = match self.load_html(name).await {
            Ok(html) => html,
            Err(error) => {
                tracing::warn!(%error, "using placeholder widget markup");
                format!(r#"<div id="{}-root"></div>"#, name)
            }
        };
        inject_protocol_hint(&html, MCP_APPS_PROTOCOL)
    }

    async fn find_fallback(&self, name: &str) -> Result<PathBuf, AssetError> {
        let not_found = || AssetError::NotFound {
            name: name.to_owned(),
            dir: self.root.clone(),
        };

        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|_| not_found())?;

        let prefix = format!("{}-", name);
        let mut fallbacks = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if let Some(file) = path.file_name().and_then(|n| n.to_str()) {
                if file.starts_with(&prefix) && file.ends_with(".html") {
                    fallbacks.push(path);
                }
            }
        }

        // Use the lexicographically last fallback (likely the latest build)
        fallbacks.sort();
        fallbacks.pop().ok_or_else(not_found)
    }
}
