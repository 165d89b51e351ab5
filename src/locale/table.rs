//! Locale lookup table
//!
//! Maps a locale code to its compiled catalog. Codes without an entry,
//! including empty or malformed ones, resolve to the default locale.
//! Adding a locale is a configuration change: one more `catalogs` entry.

use crate::config::{Config, SupportedLocale};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The catalog a locale code resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale<'a> {
    /// Locale whose catalog will be loaded
    pub locale: &'a str,

    /// Path of that compiled catalog
    pub path: &'a Path,

    /// Whether the requested code had no entry of its own
    pub is_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct LocaleTable {
    default_locale: String,
    entries: BTreeMap<String, PathBuf>,
    supported: Vec<SupportedLocale>,
}

impl LocaleTable {
    /// Build a table; `default_locale` must have an entry
    pub fn new(
        default_locale: impl Into<String>,
        entries: BTreeMap<String, PathBuf>,
        supported: Vec<SupportedLocale>,
    ) -> Option<Self> {
        let default_locale = default_locale.into();
        if !entries.contains_key(&default_locale) {
            return None;
        }
        Some(Self {
            default_locale,
            entries,
            supported,
        })
    }

    /// Table for a validated configuration
    pub fn from_config(config: &Config) -> Option<Self> {
        let compiled_dir = &config.catalogs.compiled_dir;
        let entries = config
            .locales
            .catalogs
            .iter()
            .map(|(code, file)| (code.clone(), compiled_dir.join(file)))
            .collect();
        Self::new(
            config.locales.default_locale.clone(),
            entries,
            config.locales.supported.clone(),
        )
    }

    /// Catalog for `code`, or the default locale's catalog
    pub fn resolve(&self, code: &str) -> ResolvedLocale<'_> {
        if let Some((locale, path)) = self.entries.get_key_value(code) {
            return ResolvedLocale {
                locale,
                path,
                is_fallback: false,
            };
        }

        let (locale, path) = self
            .entries
            .get_key_value(&self.default_locale)
            .map(|(l, p)| (l.as_str(), p.as_path()))
            .unwrap_or((self.default_locale.as_str(), Path::new("")));
        ResolvedLocale {
            locale,
            path,
            is_fallback: true,
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Locales for the selector, in display order
    pub fn supported(&self) -> &[SupportedLocale] {
        &self.supported
    }

    /// Locale codes that have their own catalog
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LocaleTable {
        LocaleTable::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_recognized_code_resolves_to_own_catalog() {
        let table = table();
        let resolved = table.resolve("fr");
        assert_eq!(resolved.locale, "fr");
        assert_eq!(resolved.path, Path::new("src/compiled-lang/fr.json"));
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn test_unrecognized_codes_resolve_to_default() {
        let table = table();
        for code in ["de", "", "FR", "fr-CA", "??", "english"] {
            let resolved = table.resolve(code);
            assert_eq!(resolved.locale, "en", "code {:?}", code);
            assert_eq!(resolved.path, Path::new("src/compiled-lang/en.json"));
            assert!(resolved.is_fallback);
        }
    }

    #[test]
    fn test_resolution_is_stable() {
        let table = table();
        assert_eq!(table.resolve("de"), table.resolve("de"));
    }

    #[test]
    fn test_default_code_is_not_fallback() {
        assert!(!table().resolve("en").is_fallback);
    }

    #[test]
    fn test_new_locale_is_a_table_entry() {
        let mut config = Config::default();
        config
            .locales
            .catalogs
            .insert("de".to_string(), "de.json".to_string());
        let table = LocaleTable::from_config(&config).unwrap();
        assert_eq!(table.resolve("de").locale, "de");
        assert_eq!(table.codes().collect::<Vec<_>>(), vec!["de", "en", "fr"]);
    }

    #[test]
    fn test_default_must_have_entry() {
        assert!(LocaleTable::new("en", BTreeMap::new(), Vec::new()).is_none());
    }
}
