//! Compiled catalogs
//!
//! The compiled form maps each message id to its pre-parsed element list.
//! Serialization is deterministic (sorted ids, fixed field order, trailing
//! newline), so compiling the same source twice yields identical bytes.

use super::source::SourceCatalog;
use crate::error::{CatalogError, CatalogResult};
use crate::icu::{parse, MessageElement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Pre-parsed messages for one locale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledCatalog {
    pub messages: BTreeMap<String, Vec<MessageElement>>,
}

impl CompiledCatalog {
    /// Parse every template of a source catalog
    ///
    /// Fails on the first template that does not parse; `path` names the
    /// source file in the error.
    pub fn compile(source: &SourceCatalog, path: &Path) -> CatalogResult<Self> {
        let mut messages = BTreeMap::new();
        for (id, definition) in &source.messages {
            let elements =
                parse(&definition.default_message).map_err(|e| CatalogError::InvalidMessage {
                    path: path.to_path_buf(),
                    id: id.clone(),
                    source: e,
                })?;
            messages.insert(id.clone(), elements);
        }
        Ok(Self { messages })
    }

    /// Serialize to the on-disk JSON form
    pub fn to_json(&self) -> String {
        // Serializing string-keyed maps of plain data cannot fail
        let mut json = serde_json::to_string_pretty(self).unwrap_or_default();
        json.push('\n');
        json
    }

    pub fn from_json(path: &Path, content: &str) -> CatalogResult<Self> {
        serde_json::from_str(content).map_err(|e| CatalogError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn get(&self, id: &str) -> Option<&[MessageElement]> {
        self.messages.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
