//! In-memory file payloads handed to the upload orchestrator.

use bytes::Bytes;

/// A picked file ready to upload.
///
/// `relative_path` is only set for folder uploads, where it carries the
/// path below the picked directory (e.g. `photos/2024/a.jpg`) so the
/// remote side can rebuild the sub-folder structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// File name sent to the service.
    pub name: String,
    /// File contents.
    pub data: Bytes,
    /// Path relative to the uploaded directory root.
    pub relative_path: Option<String>,
}

impl FileBlob {
    /// Create a blob for a discrete file upload.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            relative_path: None,
        }
    }

    /// Attach the path below the uploaded directory.
    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// The path the service should place this blob at: the relative path
    /// when known, the bare name otherwise.
    pub fn upload_path(&self) -> &str {
        self.relative_path.as_deref().unwrap_or(&self.name)
    }

    /// MIME type guessed from the file name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_path_prefers_relative() {
        let blob = FileBlob::new("a.txt", "hi");
        assert_eq!(blob.upload_path(), "a.txt");
        let nested = blob.with_relative_path("docs/a.txt");
        assert_eq!(nested.upload_path(), "docs/a.txt");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(FileBlob::new("x.png", "").content_type(), "image/png");
        assert_eq!(
            FileBlob::new("noext", "").content_type(),
            "application/octet-stream"
        );
    }
}
