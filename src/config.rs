//! Configuration management for intl-catalog
//!
//! Handles loading and validating the application configuration.
//! Every field has a default, so a configuration file only needs to name
//! what it changes.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application identifier, used for the per-user configuration directory
pub const APP_ID: &str = "intl-catalog";

/// Configuration file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "intl-catalog.json";

/// Directory holding the authored catalogs
pub const DEFAULT_SOURCE_DIR: &str = "src/lang";

/// Directory receiving the compiled catalogs
pub const DEFAULT_COMPILED_DIR: &str = "src/compiled-lang";

/// Locale used when no other catalog matches
pub const DEFAULT_LOCALE: &str = "en";

/// Program spawned by the external compiler backend
pub const DEFAULT_EXTERNAL_COMPILER: &str = "formatjs";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build-time catalog compilation
    pub catalogs: CatalogConfig,

    /// Runtime locale resolution
    pub locales: LocaleConfig,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Otherwise `intl-catalog.json` in the
    /// working directory is tried, then the per-user config file, then the
    /// built-in defaults.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = [
            Some(PathBuf::from(LOCAL_CONFIG_FILE)),
            Self::config_dir().ok().map(|d| d.join("config.json")),
        ];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                log::debug!("Using configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Read, parse and validate a configuration file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> ConfigResult<()> {
        let locales = &self.locales;
        if locales.default_locale.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "locales.default_locale".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !locales.catalogs.contains_key(&locales.default_locale) {
            return Err(ConfigError::InvalidValue {
                key: "locales.catalogs".to_string(),
                reason: format!(
                    "no catalog for the default locale '{}'",
                    locales.default_locale
                ),
            });
        }
        if let Some((code, _)) = locales.catalogs.iter().find(|(_, file)| file.is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: format!("locales.catalogs.{}", code),
                reason: "file name must not be empty".to_string(),
            });
        }
        if let CompilerConfig::External { program } = &self.catalogs.compiler {
            if program.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "catalogs.compiler.program".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "config_dir".to_string(),
                reason: "no configuration directory on this platform".to_string(),
            })
    }
}

/// Catalog compilation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory holding the authored catalogs
    pub source_dir: PathBuf,

    /// Directory receiving the compiled catalogs
    pub compiled_dir: PathBuf,

    /// Which compiler turns one source file into one compiled file
    pub compiler: CompilerConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            compiled_dir: PathBuf::from(DEFAULT_COMPILED_DIR),
            compiler: CompilerConfig::default(),
        }
    }
}

/// Compiler backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CompilerConfig {
    /// In-process parser
    #[default]
    Builtin,

    /// `<program> compile <input> --ast --out-file <output>`
    External {
        #[serde(default = "default_external_program")]
        program: String,
    },
}

fn default_external_program() -> String {
    DEFAULT_EXTERNAL_COMPILER.to_string()
}

/// A locale offered in the language selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedLocale {
    /// Two-letter locale code
    pub code: String,

    /// Display name
    pub name: String,
}

impl SupportedLocale {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Runtime locale configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale loaded when no other catalog matches
    pub default_locale: String,

    /// Locales offered in the selector, in display order
    pub supported: Vec<SupportedLocale>,

    /// Locale code to compiled catalog file name (relative to `compiled_dir`)
    pub catalogs: BTreeMap<String, String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        let mut catalogs = BTreeMap::new();
        catalogs.insert("en".to_string(), "en.json".to_string());
        catalogs.insert("fr".to_string(), "fr.json".to_string());

        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            supported: vec![
                SupportedLocale::new("en", "English"),
                SupportedLocale::new("fr", "French"),
            ],
            catalogs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalogs.source_dir, PathBuf::from("src/lang"));
        assert_eq!(config.catalogs.compiled_dir, PathBuf::from("src/compiled-lang"));
        assert_eq!(config.catalogs.compiler, CompilerConfig::Builtin);
        assert_eq!(config.locales.default_locale, "en");
        assert_eq!(config.locales.supported.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"catalogs": {"compiler": {"kind": "external"}}}"#,
        )
        .unwrap();
        assert_eq!(
            config.catalogs.compiler,
            CompilerConfig::External {
                program: "formatjs".to_string()
            }
        );
        assert_eq!(config.catalogs.source_dir, PathBuf::from("src/lang"));
        assert_eq!(config.locales.default_locale, "en");
    }

    #[test]
    fn test_validate_rejects_default_without_catalog() {
        let mut config = Config::default();
        config.locales.default_locale = "de".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("locales.catalogs"));
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intl-catalog.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.locales.catalogs, deserialized.locales.catalogs);
    }
}
