//! Catalog file I/O
//!
//! Provides safe catalog reading and writing with:
//! - File size limits
//! - UTF-8 BOM stripping
//! - Atomic writes so a reader never sees a half-written catalog

use crate::error::{CatalogError, CatalogResult};
use std::path::Path;
use std::time::SystemTime;

/// Maximum catalog size accepted (10 MB)
pub const MAX_CATALOG_SIZE: u64 = 10 * 1024 * 1024;

const UTF8_BOM: &str = "\u{FEFF}";

/// Read a catalog file as text
pub async fn read_catalog_file(path: impl AsRef<Path>) -> CatalogResult<String> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();

    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CatalogError::NotFound(path_buf));
        }
        Err(e) => {
            return Err(CatalogError::ReadError {
                path: path_buf,
                source: e,
            })
        }
    };

    let size = metadata.len();
    if size > MAX_CATALOG_SIZE {
        return Err(CatalogError::TooLarge {
            path: path_buf,
            size,
            max_size: MAX_CATALOG_SIZE,
        });
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::ReadError {
            path: path_buf,
            source: e,
        })?;

    Ok(match content.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Write content to a file using atomic write
///
/// The content goes to a temporary sibling first and is renamed over the
/// target, so the file is either fully written or unchanged.
pub async fn write_file_atomic(path: impl AsRef<Path>, content: &str) -> CatalogResult<()> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();

    let parent = path.parent().unwrap_or(Path::new("."));
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "catalog".to_string());

    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let temp_path = parent.join(format!(".{}.{}.tmp", filename, timestamp));

    let write_result = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        tokio::io::AsyncWriteExt::write_all(&mut file, content.as_bytes()).await?;
        tokio::io::AsyncWriteExt::flush(&mut file).await?;
        file.sync_all().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = write_result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(CatalogError::WriteError {
            path: path_buf,
            source: e,
        });
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(CatalogError::WriteError {
            path: path_buf,
            source: e,
        });
    }

    Ok(())
}

/// Create a directory (and parents) if it does not exist yet
pub async fn ensure_dir(path: impl AsRef<Path>) -> CatalogResult<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| CatalogError::DirectoryError {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_catalog_file(dir.path().join("fr.json")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_strips_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.json");
        std::fs::write(&path, "\u{FEFF}{}").unwrap();
        assert_eq!(read_catalog_file(&path).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_content_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.json");
        std::fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src").join("compiled-lang");
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
