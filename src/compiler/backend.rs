//! Per-file compiler backends
//!
//! A backend turns one source catalog into one compiled catalog. The
//! built-in backend parses templates in-process; the external backend
//! spawns a message compiler CLI with `compile <input> --ast --out-file
//! <output>`.

use crate::catalog::{write_file_atomic, CompiledCatalog, SourceCatalog};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use std::path::Path;
use tokio::process::Command;

/// How a single catalog file gets compiled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerBackend {
    /// Parse in-process and write the AST catalog
    Builtin,

    /// Spawn an external compiler program
    External { program: String },
}

impl From<&CompilerConfig> for CompilerBackend {
    fn from(config: &CompilerConfig) -> Self {
        match config {
            CompilerConfig::Builtin => CompilerBackend::Builtin,
            CompilerConfig::External { program } => CompilerBackend::External {
                program: program.clone(),
            },
        }
    }
}

impl CompilerBackend {
    /// Compile `input` into `output`
    ///
    /// Returns the number of messages written when the backend knows it.
    pub async fn compile_file(&self, input: &Path, output: &Path) -> Result<Option<usize>, CompileError> {
        match self {
            CompilerBackend::Builtin => {
                let source = SourceCatalog::read(input).await?;
                if source.is_empty() {
                    log::warn!("{} has no messages", input.display());
                }
                let compiled = CompiledCatalog::compile(&source, input)?;
                write_file_atomic(output, &compiled.to_json()).await?;
                Ok(Some(compiled.len()))
            }
            CompilerBackend::External { program } => {
                let result = Command::new(program)
                    .arg("compile")
                    .arg(input)
                    .arg("--ast")
                    .arg("--out-file")
                    .arg(output)
                    .kill_on_drop(true)
                    .output()
                    .await
                    .map_err(|e| CompileError::SpawnError {
                        program: program.clone(),
                        source: e,
                    })?;

                if !result.status.success() {
                    return Err(CompileError::ToolFailed {
                        program: program.clone(),
                        status: result.status,
                        stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
                    });
                }
                Ok(None)
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CompilerBackend::Builtin => "builtin",
            CompilerBackend::External { program } => program,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_builtin_compiles_catalog() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("en.json");
        let output = dir.path().join("out.json");
        fs::write(
            &input,
            r#"{"user.userName": {"defaultMessage": "My name is {name}"}}"#,
        )
        .unwrap();

        let count = CompilerBackend::Builtin.compile_file(&input, &output).await.unwrap();
        assert_eq!(count, Some(1));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({
                "user.userName": [
                    {"type": 0, "value": "My name is "},
                    {"type": 1, "value": "name"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_builtin_reports_invalid_template() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("en.json");
        fs::write(&input, r#"{"bad": {"defaultMessage": "{x, color}"}}"#).unwrap();

        let err = CompilerBackend::Builtin
            .compile_file(&input, &dir.path().join("out.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Catalog(CatalogError::InvalidMessage { .. })
        ));
        assert!(!dir.path().join("out.json").exists());
    }

    #[tokio::test]
    async fn test_external_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let backend = CompilerBackend::External {
            program: "intl-catalog-no-such-compiler".to_string(),
        };
        let err = backend
            .compile_file(&dir.path().join("en.json"), &dir.path().join("out.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompileError::SpawnError { .. }));
    }

    #[test]
    fn test_backend_from_config() {
        let backend = CompilerBackend::from(&CompilerConfig::External {
            program: "formatjs".to_string(),
        });
        assert_eq!(backend.name(), "formatjs");
        assert_eq!(CompilerBackend::from(&CompilerConfig::Builtin).name(), "builtin");
    }
}
