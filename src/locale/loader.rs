//! Locale data loader
//!
//! Resolves a locale code through the [`LocaleTable`] and reads the
//! matching compiled catalog. There is no second fallback: if the resolved
//! catalog is missing or malformed, the load fails.

use super::table::LocaleTable;
use crate::catalog::read_catalog_file;
use crate::error::{CatalogError, LoadResult};
use crate::icu::MessageElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// How a loaded message is represented
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageRepr {
    /// Raw template, parsed when formatted
    Template(String),

    /// Pre-parsed elements from an AST catalog
    Elements(Vec<MessageElement>),
}

/// Message id to message
pub type Messages = BTreeMap<String, MessageRepr>;

/// What the rendering layer receives
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleData {
    /// Locale whose catalog was loaded (after fallback)
    pub locale: String,

    /// Locale code that was asked for
    pub requested: String,

    pub messages: Messages,
}

/// Load the catalog `code` resolves to
pub async fn load_locale_data(table: &LocaleTable, code: &str) -> LoadResult<LocaleData> {
    let resolved = table.resolve(code);
    if resolved.is_fallback {
        log::debug!(
            "No catalog for '{}', using default locale '{}'",
            code,
            resolved.locale
        );
    }

    let messages = load_messages(resolved.path).await?;
    log::debug!(
        "Loaded {} message(s) for '{}' from {}",
        messages.len(),
        resolved.locale,
        resolved.path.display()
    );

    Ok(LocaleData {
        locale: resolved.locale.to_string(),
        requested: code.to_string(),
        messages,
    })
}

/// Read a compiled catalog file
pub async fn load_messages(path: &Path) -> LoadResult<Messages> {
    let content = read_catalog_file(path).await?;
    let messages = serde_json::from_str(&content).map_err(|e| CatalogError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(messages)
}
