//! Picked files awaiting upload, and loading them from disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use filedeck_core::{AppError, AppResult};
use filedeck_entity::FileBlob;

/// The files currently picked in an upload control.
///
/// The orchestrator drains it when an upload starts, so the control is
/// empty again whatever the upload's outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    blobs: Vec<FileBlob>,
}

impl FileInput {
    /// Create an input holding `blobs`.
    pub fn new(blobs: Vec<FileBlob>) -> Self {
        Self { blobs }
    }

    /// Read discrete files from disk.
    pub async fn from_files(paths: &[PathBuf]) -> AppResult<Self> {
        let mut blobs = Vec::with_capacity(paths.len());
        for path in paths {
            let name = file_name(path)?;
            let data = tokio::fs::read(path).await.map_err(|e| {
                AppError::with_source(
                    filedeck_core::ErrorKind::Validation,
                    format!("Cannot read '{}': {e}", path.display()),
                    e,
                )
            })?;
            blobs.push(FileBlob::new(name, data));
        }
        Ok(Self { blobs })
    }

    /// Read every file below `root`, keeping paths relative to the
    /// directory's parent (`photos/2024/a.jpg` for a picked `photos`).
    pub async fn from_directory(root: &Path) -> AppResult<Self> {
        let root_name = file_name(root)?;
        let mut blobs = Vec::new();
        let mut pending = vec![(root.to_path_buf(), root_name)];

        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let name = file_name(&path)?;
                let relative = format!("{prefix}/{name}");
                if entry.file_type().await?.is_dir() {
                    pending.push((path, relative));
                } else {
                    let data = tokio::fs::read(&path).await?;
                    blobs.push(FileBlob::new(name, data).with_relative_path(relative));
                }
            }
        }

        blobs.sort_by(|a, b| a.upload_path().cmp(b.upload_path()));
        debug!(root = %root.display(), files = blobs.len(), "Collected folder upload");
        Ok(Self { blobs })
    }

    /// Add one blob.
    pub fn push(&mut self, blob: FileBlob) {
        self.blobs.push(blob);
    }

    /// Picked blobs.
    pub fn blobs(&self) -> &[FileBlob] {
        &self.blobs
    }

    /// Number of picked files.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether nothing is picked.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Empty the control and hand back what was picked.
    pub fn take(&mut self) -> Vec<FileBlob> {
        std::mem::take(&mut self.blobs)
    }
}

fn file_name(path: &Path) -> AppResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::validation(format!("'{}' has no file name", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_paths_include_root_name() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("photos");
        std::fs::create_dir_all(root.join("2024")).expect("mkdir");
        std::fs::write(root.join("2024").join("a.jpg"), b"a").expect("write");
        std::fs::write(root.join("b.jpg"), b"bb").expect("write");

        let input = FileInput::from_directory(&root).await.expect("collect");
        let paths: Vec<_> = input.blobs().iter().map(|b| b.upload_path()).collect();
        assert_eq!(paths, vec!["photos/2024/a.jpg", "photos/b.jpg"]);
        assert_eq!(input.blobs()[1].size(), 2);
    }

    #[tokio::test]
    async fn test_from_files_reads_contents() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"hello").expect("write");

        let mut input = FileInput::from_files(&[path]).await.expect("read");
        assert_eq!(input.blobs()[0].name, "notes.txt");
        assert_eq!(input.take().len(), 1);
        assert!(input.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_validation_error() {
        let err = FileInput::from_files(&[PathBuf::from("/definitely/not/here.txt")])
            .await
            .expect_err("missing");
        assert_eq!(err.kind, filedeck_core::ErrorKind::Validation);
    }
}
