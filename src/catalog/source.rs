//! Source (authored) catalogs
//!
//! A source catalog is a JSON object mapping message id to a definition:
//!
//! ```json
//! {
//!   "user.userName": {
//!     "description": "User name",
//!     "defaultMessage": "My name is {name}"
//!   }
//! }
//! ```
//!
//! A bare string is accepted in place of the definition object.

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One authored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDefinition {
    /// Hint for translators, never shown to end users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Template text with `{name}` placeholders
    pub default_message: String,
}

impl MessageDefinition {
    pub fn new(default_message: impl Into<String>) -> Self {
        Self {
            description: None,
            default_message: default_message.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceEntry {
    Simple(String),
    Definition(MessageDefinition),
}

impl From<SourceEntry> for MessageDefinition {
    fn from(entry: SourceEntry) -> Self {
        match entry {
            SourceEntry::Simple(message) => MessageDefinition::new(message),
            SourceEntry::Definition(definition) => definition,
        }
    }
}

/// All authored messages for one locale, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCatalog {
    pub messages: BTreeMap<String, MessageDefinition>,
}

impl SourceCatalog {
    /// Parse a source catalog; `path` is only used for error reporting
    pub fn from_json(path: &Path, content: &str) -> CatalogResult<Self> {
        let entries: BTreeMap<String, SourceEntry> =
            serde_json::from_str(content).map_err(|e| CatalogError::Malformed {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            messages: entries
                .into_iter()
                .map(|(id, entry)| (id, entry.into()))
                .collect(),
        })
    }

    /// Read and parse a source catalog from disk
    pub async fn read(path: &Path) -> CatalogResult<Self> {
        let content = super::io::read_catalog_file(path).await?;
        Self::from_json(path, &content)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
