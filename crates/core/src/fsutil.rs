//! Artifact writing helpers.
//!
//! Stage status is decided by file existence, so an artifact must never be
//! visible at its final path before it is complete. Writers produce the file
//! at a staging path next to the destination and rename it into place.

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Staging path for `final_path`: `dir/name.partial.ext`.
///
/// The extension is kept so tools that infer formats from it still work.
pub fn staging_path(final_path: &Path) -> PathBuf {
    let stem = final_path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();

    let mut file_name = stem;
    file_name.push(".partial");
    if let Some(ext) = final_path.extension() {
        file_name.push(".");
        file_name.push(ext);
    }

    final_path.with_file_name(file_name)
}

/// Creates the parent directory of `path` if needed.
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}

/// Moves a finished staging file to its final path.
pub async fn promote(staging: &Path, final_path: &Path) -> std::io::Result<()> {
    fs::rename(staging, final_path).await
}

/// Removes a leftover staging file, ignoring a missing one.
pub async fn discard(staging: &Path) -> std::io::Result<()> {
    match fs::remove_file(staging).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Writes `contents` to `path` through a staging file.
pub async fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> std::io::Result<()> {
    ensure_parent_dir(path).await?;
    let staging = staging_path(path);
    if let Err(e) = fs::write(&staging, contents).await {
        discard(&staging).await?;
        return Err(e);
    }
    promote(&staging, path).await
}

/// Writes pretty-printed JSON to `path` through a staging file.
pub async fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), JsonWriteError> {
    let json = serde_json::to_vec_pretty(value)?;
    write_atomic(path, json).await?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum JsonWriteError {
    #[error("Failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_staging_path_keeps_extension() {
        assert_eq!(
            staging_path(Path::new("/a/season-1/01-02-title.mp3")),
            PathBuf::from("/a/season-1/01-02-title.partial.mp3")
        );
        assert_eq!(
            staging_path(Path::new("noext")),
            PathBuf::from("noext.partial")
        );
    }

    #[tokio::test]
    async fn test_write_atomic_creates_dirs_and_leaves_no_staging() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transcripts/season-1/01-01-x.txt");

        write_atomic(&path, "hello").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        assert!(!staging_path(&path).exists());
    }

    #[tokio::test]
    async fn test_write_json_atomic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        write_json_atomic(&path, &vec![1, 2, 3]).await.unwrap();

        let read: Vec<u32> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(read, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_discard_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(discard(&dir.path().join("nothing")).await.is_ok());
    }
}
