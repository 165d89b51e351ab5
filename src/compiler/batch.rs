//! Batch compilation of a catalog directory
//!
//! Every source file is compiled in its own task. All tasks are started
//! before any is awaited; the batch then waits for every one of them and
//! reports a per-file outcome. One file failing never stops the others.

use super::backend::CompilerBackend;
use crate::catalog::{ensure_dir, find_orphans, list_catalog_files};
use crate::config::CatalogConfig;
use crate::error::{CatalogResult, CompileError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Result of compiling one source file
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Message count when the backend reports it
    pub result: Result<Option<usize>, CompileError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per source file, in source-directory order
    pub outcomes: Vec<FileOutcome>,

    /// Compiled files with no source counterpart (left in place)
    pub orphans: Vec<PathBuf>,

    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when every file compiled
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Log one line per file plus a summary
    pub fn log(&self) {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(Some(count)) => log::debug!(
                    "Compiled {} -> {} ({} messages)",
                    outcome.source.display(),
                    outcome.output.display(),
                    count
                ),
                Ok(None) => log::debug!(
                    "Compiled {} -> {}",
                    outcome.source.display(),
                    outcome.output.display()
                ),
                Err(e) => log::error!("Failed to compile {}: {}", outcome.source.display(), error_chain(e)),
            }
        }
        for orphan in &self.orphans {
            log::warn!("Compiled catalog has no source file: {}", orphan.display());
        }
        log::info!(
            "Compiled {} of {} catalog(s) in {} ms",
            self.succeeded().count(),
            self.outcomes.len(),
            self.elapsed_ms
        );
    }
}

/// Compiles every catalog of a source directory into a destination directory
#[derive(Debug, Clone)]
pub struct BatchCompiler {
    source_dir: PathBuf,
    compiled_dir: PathBuf,
    backend: Arc<CompilerBackend>,
}

impl BatchCompiler {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        compiled_dir: impl Into<PathBuf>,
        backend: CompilerBackend,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            compiled_dir: compiled_dir.into(),
            backend: Arc::new(backend),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            &config.source_dir,
            &config.compiled_dir,
            CompilerBackend::from(&config.compiler),
        )
    }

    /// Output path for a source file: same base name, destination directory
    pub fn output_path(&self, source: &Path) -> Option<PathBuf> {
        source.file_name().map(|name| self.compiled_dir.join(name))
    }

    /// Compile the whole directory
    ///
    /// Fails before compiling anything if the source directory cannot be
    /// listed or the destination directory cannot be created. Per-file
    /// failures are returned inside the report.
    pub async fn run(&self) -> CatalogResult<BatchReport> {
        let start = Instant::now();
        log::info!(
            "Compiling catalogs from {} into {} ({})",
            self.source_dir.display(),
            self.compiled_dir.display(),
            self.backend.name()
        );

        let sources = list_catalog_files(&self.source_dir)?;
        ensure_dir(&self.compiled_dir).await?;

        let mut pending = Vec::with_capacity(sources.len());
        for source in &sources {
            let Some(output) = self.output_path(source) else {
                continue;
            };
            let backend = Arc::clone(&self.backend);
            let input = source.clone();
            let target = output.clone();
            let handle =
                tokio::spawn(async move { backend.compile_file(&input, &target).await });
            pending.push((source.clone(), output, handle));
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        for (source, output, handle) in pending {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Compile task for {} aborted: {}", source.display(), e);
                    Err(CompileError::TaskFailed {
                        path: source.clone(),
                    })
                }
            };
            outcomes.push(FileOutcome {
                source,
                output,
                result,
            });
        }

        let orphans = orphans_or_empty(find_orphans(&sources, &self.compiled_dir));

        Ok(BatchReport {
            outcomes,
            orphans,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Orphan list, or none if the compiled directory could not be listed
fn orphans_or_empty(result: CatalogResult<Vec<PathBuf>>) -> Vec<PathBuf> {
    result.unwrap_or_else(|e| {
        log::warn!("Could not check for orphaned catalogs: {}", error_chain(&e));
        Vec::new()
    })
}

/// Render an error and its sources on one line
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
