//! Catalog directory scanner
//!
//! Lists the catalog files directly inside a directory. The scan is one
//! level deep: sub-directories and hidden entries are skipped.

use crate::error::{CatalogError, CatalogResult};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// List the regular files directly inside `dir`, sorted by name
///
/// Fails only if `dir` itself cannot be read, including when it is not a
/// directory. Unreadable individual entries are logged and skipped.
pub fn list_catalog_files(dir: impl AsRef<Path>) -> CatalogResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    // A plain file would otherwise walk as an empty directory
    std::fs::read_dir(dir).map_err(|e| CatalogError::DirectoryScanError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(CatalogError::DirectoryScanError {
                    path: dir.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() || is_hidden(&entry) {
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

/// Files in `compiled_dir` that have no source file of the same name
///
/// A missing `compiled_dir` has no orphans.
pub fn find_orphans(
    source_files: &[PathBuf],
    compiled_dir: impl AsRef<Path>,
) -> CatalogResult<Vec<PathBuf>> {
    let compiled_dir = compiled_dir.as_ref();
    if !compiled_dir.is_dir() {
        return Ok(Vec::new());
    }

    let source_names: HashSet<OsString> = source_files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_os_string()))
        .collect();

    Ok(list_catalog_files(compiled_dir)?
        .into_iter()
        .filter(|p| {
            p.file_name()
                .map(|n| !source_names.contains(n))
                .unwrap_or(false)
        })
        .collect())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_lang_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::write(base.join("fr.json"), "{}").unwrap();
        fs::write(base.join("en.json"), "{}").unwrap();
        fs::write(base.join(".DS_Store"), "").unwrap();
        fs::create_dir(base.join("drafts")).unwrap();
        fs::write(base.join("drafts/de.json"), "{}").unwrap();

        dir
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_lists_top_level_files_sorted() {
        let dir = setup_lang_dir();
        let files = list_catalog_files(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["en.json", "fr.json"]);
    }

    #[test]
    fn test_missing_directory_is_scan_error() {
        let dir = TempDir::new().unwrap();
        let err = list_catalog_files(dir.path().join("lang")).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryScanError { .. }));
    }

    #[test]
    fn test_file_instead_of_directory_is_scan_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("lang");
        fs::write(&file, "{}").unwrap();

        let err = list_catalog_files(&file).unwrap_err();
        match err {
            CatalogError::DirectoryScanError { path, .. } => assert_eq!(path, file),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_find_orphans() {
        let src = setup_lang_dir();
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("en.json"), "{}").unwrap();
        fs::write(out.path().join("es.json"), "{}").unwrap();

        let sources = list_catalog_files(src.path()).unwrap();
        let orphans = find_orphans(&sources, out.path()).unwrap();
        assert_eq!(names(&orphans), vec!["es.json"]);
    }

    #[test]
    fn test_find_orphans_without_compiled_dir() {
        let src = setup_lang_dir();
        let sources = list_catalog_files(src.path()).unwrap();
        let orphans = find_orphans(&sources, src.path().join("missing")).unwrap();
        assert!(orphans.is_empty());
    }
}
