//! Error types for intl-catalog
//!
//! This module defines all custom error types used throughout the application.
//! Error types are organized by concern: configuration, catalog files, the
//! per-file compiler, message templates and the runtime loader.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Could not read configuration: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing configuration
    #[error("Invalid configuration format in {path}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Catalog file errors, shared by the compiler and the loader
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The source directory could not be listed
    #[error("Unable to scan directory: {path}")]
    DirectoryScanError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory could not be created
    #[error("Could not create directory: {path}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file not found at specified path
    #[error("Catalog not found: {0}")]
    NotFound(PathBuf),

    /// Catalog file is larger than the configured limit
    #[error("Catalog too large: {path} ({size} bytes, max {max_size} bytes)")]
    TooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Error reading a catalog file
    #[error("Could not read catalog: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a catalog file
    #[error("Could not write catalog: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid catalog JSON
    #[error("Malformed catalog: {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A message template in a source catalog failed to parse
    #[error("Invalid message '{id}' in {path}")]
    InvalidMessage {
        path: PathBuf,
        id: String,
        #[source]
        source: ParseError,
    },
}

/// Errors raised while compiling a single catalog file
#[derive(Error, Debug)]
pub enum CompileError {
    /// The built-in compiler failed on the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The external compiler could not be started
    #[error("Could not run {program}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external compiler exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The compile task panicked or was cancelled
    #[error("Compile task for {path} did not complete")]
    TaskFailed { path: PathBuf },
}

/// What went wrong while parsing a message template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("empty argument")]
    EmptyArgument,

    #[error("malformed argument")]
    MalformedArgument,

    #[error("unclosed argument")]
    UnclosedArgument,

    #[error("unmatched closing brace")]
    UnmatchedBrace,

    #[error("invalid argument type '{0}'")]
    InvalidArgumentType(String),

    #[error("expected selector")]
    ExpectedSelector,

    #[error("expected '{{' to open the selector body")]
    ExpectedSelectorBody,

    #[error("duplicate selector '{0}'")]
    DuplicateSelector(String),

    #[error("missing 'other' selector")]
    MissingOtherClause,

    #[error("invalid plural offset")]
    InvalidOffset,

    #[error("closing tag </{0}> has no matching opening tag")]
    UnmatchedClosingTag(String),

    #[error("tag <{0}> is never closed")]
    UnclosedTag(String),

    #[error("nested more than {0} levels deep")]
    TooDeep(usize),
}

/// Message template syntax error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the template
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Errors raised while formatting a message with values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A placeholder has no value
    #[error("No value provided for '{0}'")]
    MissingValue(String),

    /// A plural or number placeholder received a non-numeric value
    #[error("Value for '{0}' is not a number")]
    NotANumber(String),

    /// The stored template could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Runtime locale loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// The resolved catalog could not be read or parsed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A newer locale request replaced this one before it was applied
    #[error("Load of '{locale}' was superseded by a newer request")]
    Superseded { locale: String },

    /// The load task panicked
    #[error("Load task for '{locale}' did not complete")]
    TaskFailed { locale: String },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for catalog file operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type alias for runtime loads
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound(PathBuf::from("/lang/fr.json"));
        assert!(err.to_string().contains("/lang/fr.json"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(ParseErrorKind::UnclosedArgument, 11);
        assert_eq!(err.to_string(), "unclosed argument at offset 11");
    }

    #[test]
    fn test_load_error_from_catalog_error() {
        let err: LoadError = CatalogError::NotFound(PathBuf::from("fr.json")).into();
        assert!(matches!(err, LoadError::Catalog(CatalogError::NotFound(_))));
        assert!(err.to_string().contains("fr.json"));
    }
}
